//! Platform capability backends.
//!
//! The correct native backend is selected at compile time via
//! `#[cfg(target_os = ...)]` and returned by [`native_backend`]:
//!
//! | Module        | OS                | APIs used                                   |
//! |---------------|-------------------|---------------------------------------------|
//! | `windows`     | Windows           | `SetCursorPos`, `ClipCursor`, `SendInput`   |
//! | `macos`       | macOS             | `CGWarpMouseCursorPosition`, `CGEventTap`   |
//! | `x11`         | Linux, FreeBSD    | `XWarpPointer`, `XGrabPointer`, XTest       |
//! | `unsupported` | everything else   | none                                        |
//!
//! [`MockCapabilityBackend`] is always compiled so tests on any platform and
//! the `mock` configuration setting can use it without a display.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::capability::CapabilityBackend;

pub mod mock;
pub mod unsupported;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(any(target_os = "linux", target_os = "freebsd"))]
pub mod x11;

pub use mock::MockCapabilityBackend;
pub use unsupported::UnsupportedBackend;

/// Which backend the agent runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The backend for the compile target.
    #[default]
    Native,
    /// Every capability fails.  Useful to exercise error paths.
    Unsupported,
    /// Records calls in memory; never touches the OS.
    Mock,
}

/// Builds the backend for `kind`.
pub fn build_backend(kind: BackendKind) -> Arc<dyn CapabilityBackend> {
    match kind {
        BackendKind::Native => native_backend(),
        BackendKind::Unsupported => Arc::new(UnsupportedBackend),
        BackendKind::Mock => Arc::new(MockCapabilityBackend::new()),
    }
}

/// The backend for the platform this binary was compiled for.
#[cfg(target_os = "windows")]
pub fn native_backend() -> Arc<dyn CapabilityBackend> {
    Arc::new(windows::WindowsBackend::new())
}

#[cfg(target_os = "macos")]
pub fn native_backend() -> Arc<dyn CapabilityBackend> {
    Arc::new(macos::QuartzBackend::new())
}

#[cfg(any(target_os = "linux", target_os = "freebsd"))]
pub fn native_backend() -> Arc<dyn CapabilityBackend> {
    Arc::new(x11::X11Backend::new())
}

#[cfg(not(any(
    target_os = "windows",
    target_os = "macos",
    target_os = "linux",
    target_os = "freebsd"
)))]
pub fn native_backend() -> Arc<dyn CapabilityBackend> {
    Arc::new(UnsupportedBackend)
}
