//! Platform-specific display enumeration.
//!
//! Each platform implements [`PlatformDisplayEnumerator`]; the correct one is
//! selected at compile time via `#[cfg(target_os = ...)]` and re-exported as
//! `NativeDisplayEnumerator`:
//!
//! | Module    | OS             | API used                                              |
//! |-----------|----------------|-------------------------------------------------------|
//! | `windows` | Windows        | `EnumDisplayMonitors` + `EnumDisplaySettingsW` + DPI  |
//! | `x11`     | Linux, FreeBSD | Xlib screens + XRandR current rate                    |
//! | `macos`   | macOS          | `CGGetActiveDisplayList` + `CGDisplayCopyDisplayMode` |
//!
//! Platforms without an implementation get [`NoDisplays`].
//!
//! Records are returned in the OS's enumeration order.  Ids are assigned
//! later by the introspection service, after zero-sized entries are dropped.

use hostctl_core::domain::introspection::DisplayRecord;
use thiserror::Error;

/// Error type for display enumeration.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The platform API call to enumerate displays failed.
    #[error("platform API error while enumerating displays: {0}")]
    PlatformError(String),
}

/// Enumerates attached displays on the current platform.
pub trait PlatformDisplayEnumerator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`DisplayError::PlatformError`] if the OS cannot be queried
    /// (for example no display server).
    fn enumerate_displays(&self) -> Result<Vec<DisplayRecord>, DisplayError>;
}

/// Dots per inch from a pixel extent and its physical size in millimetres.
/// Zero when the physical size is unknown.
pub(crate) fn dpi_from_physical(pixels: u32, millimetres: f64) -> u32 {
    if millimetres <= 0.0 {
        return 0;
    }
    (f64::from(pixels) * 25.4 / millimetres).round() as u32
}

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use windows::WindowsDisplayEnumerator as NativeDisplayEnumerator;

#[cfg(any(target_os = "linux", target_os = "freebsd"))]
pub mod x11;

#[cfg(any(target_os = "linux", target_os = "freebsd"))]
pub use x11::X11DisplayEnumerator as NativeDisplayEnumerator;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "macos")]
pub use macos::MacosDisplayEnumerator as NativeDisplayEnumerator;

#[cfg(not(any(
    target_os = "windows",
    target_os = "macos",
    target_os = "linux",
    target_os = "freebsd"
)))]
pub use NoDisplays as NativeDisplayEnumerator;

/// Enumerator for platforms without display support.  Always empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDisplays;

impl NoDisplays {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformDisplayEnumerator for NoDisplays {
    fn enumerate_displays(&self) -> Result<Vec<DisplayRecord>, DisplayError> {
        Ok(Vec::new())
    }
}
