//! The Capability Backend contract.
//!
//! One implementation exists per target platform (Windows, macOS, X11) plus
//! a fallback for everything else.  The services depend only on this trait;
//! the concrete backend is chosen at startup (see
//! `infrastructure::backend::native_backend`).
//!
//! # Capability models differ; the contract does not
//!
//! | Backend     | read / warp                 | confinement                       | key injection              |
//! |-------------|-----------------------------|-----------------------------------|----------------------------|
//! | Windows     | `GetCursorPos`/`SetCursorPos` | `ClipCursor` on the client rect   | `SendInput`                |
//! | macOS       | `CGEventGetLocation`/warp   | event tap that clamps every move  | `CGEventPost` with a source |
//! | X11         | `XQueryPointer`/`XWarpPointer` | `XGrabPointer` confined to window | `XTestFakeKeyEvent` + flush |
//! | unsupported | fails                       | fails                             | fails                      |
//!
//! # Fault boundary
//!
//! Every native failure is converted into a [`BackendError`] inside the
//! backend.  Nothing OS-level propagates past this trait.

use hostctl_core::{KeyCode, KeyTransition, NativeWindow, PointerPosition};
use thiserror::Error;

/// Failure of a single capability call.
#[derive(Debug, Error)]
pub enum BackendError {
    /// No display / window-server session could be reached.
    #[error("no display session available: {0}")]
    NoSession(String),

    /// A native call reported failure.
    #[error("{call} failed: {detail}")]
    NativeCall { call: &'static str, detail: String },

    /// Confinement was requested but no window handle is available.
    #[error("no window handle available for confinement")]
    NoWindow,

    /// The window handle belongs to a different platform.
    #[error("window handle {0:?} cannot be used by this backend")]
    ForeignWindow(NativeWindow),

    /// The key code does not fit the platform's key code type.
    #[error("key code {0} is out of range for this platform")]
    InvalidKeyCode(KeyCode),

    /// The platform has no backend; every capability reports this.
    #[error("not supported on this platform")]
    Unsupported,
}

impl BackendError {
    pub fn native(call: &'static str, detail: impl ToString) -> Self {
        BackendError::NativeCall {
            call,
            detail: detail.to_string(),
        }
    }
}

/// An acquired pointer confinement.
///
/// Holding the value means the pointer is confined.  [`Confinement::release`]
/// tears the native resources down and reports whether that worked.
/// Implementations also release on drop (ignoring errors) so a confinement
/// that is never explicitly released cannot leak.
pub trait Confinement: Send {
    /// Releases the confinement and restores normal pointer movement.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the native release call fails.  The
    /// resource is considered gone either way.
    fn release(self: Box<Self>) -> Result<(), BackendError>;
}

/// Platform-specific pointer and keyboard capabilities.
pub trait CapabilityBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Reads the current pointer location in screen coordinates.
    fn pointer_read(&self) -> Result<PointerPosition, BackendError>;

    /// Warps the pointer to an absolute position.  Coordinates are not
    /// validated against the screen size.
    fn pointer_write(&self, position: PointerPosition) -> Result<(), BackendError>;

    /// Confines the pointer to `window` until the returned value is released.
    fn pointer_confine(&self, window: NativeWindow) -> Result<Box<dyn Confinement>, BackendError>;

    /// Injects one half transition for `code`.
    fn key_inject(&self, code: KeyCode, transition: KeyTransition) -> Result<(), BackendError>;
}
