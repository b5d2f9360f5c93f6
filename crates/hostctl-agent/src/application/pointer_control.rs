//! Pointer Control Service: pointer get/set and the grab state machine.
//!
//! # Grab state machine
//!
//! ```text
//!                 set_grabbing(true) ok
//!   ┌───────────┐ ─────────────────────▶ ┌─────────┐
//!   │ Ungrabbed │                        │ Grabbed │──┐ set_grabbing(true):
//!   └───────────┘ ◀───────────────────── └─────────┘◀─┘ release + re-acquire
//!                 set_grabbing(false)
//!                 (whatever the release result)
//! ```
//!
//! The service is the sole owner of the grab.  The confinement resource lives
//! inside [`GrabState::Grabbed`], so there is at most one per service and it
//! is dropped (and therefore released) on every path out of that state.
//!
//! Grab calls take `&mut self`: concurrent grab/ungrab from several callers is
//! not supported and the borrow checker forces callers to serialize them.

use std::sync::Arc;

use hostctl_core::{CommandError, NativeWindow, PointerPosition};
use tracing::{debug, info, warn};

use super::capability::{CapabilityBackend, Confinement};

/// Supplies the native window that confinement is scoped to.
#[cfg_attr(test, mockall::automock)]
pub trait WindowHandleProvider: Send + Sync {
    /// Returns the caller-owning window, or `None` if there is none yet.
    fn native_window(&self) -> Option<NativeWindow>;
}

/// Process-wide grab state.
enum GrabState {
    Ungrabbed,
    Grabbed(Box<dyn Confinement>),
}

/// Routes pointer operations to the active [`CapabilityBackend`].
pub struct PointerControlService {
    backend: Arc<dyn CapabilityBackend>,
    windows: Arc<dyn WindowHandleProvider>,
    grab: GrabState,
}

impl PointerControlService {
    /// Creates the service in the `Ungrabbed` state.
    pub fn new(backend: Arc<dyn CapabilityBackend>, windows: Arc<dyn WindowHandleProvider>) -> Self {
        Self {
            backend,
            windows,
            grab: GrabState::Ungrabbed,
        }
    }

    /// Returns the OS-reported pointer location.  Never cached.
    ///
    /// # Errors
    ///
    /// [`CommandError::NativeRuntimeFailure`] if the backend cannot read the
    /// pointer (only the fallback backend, or no display session).
    pub fn get_position(&self) -> Result<PointerPosition, CommandError> {
        self.backend.pointer_read().map_err(|e| {
            warn!(backend = self.backend.name(), "pointer read failed: {e}");
            CommandError::NativeRuntimeFailure(e.to_string())
        })
    }

    /// Warps the pointer.  Out-of-screen coordinates are passed through.
    ///
    /// # Errors
    ///
    /// [`CommandError::CursorSetFailure`] if the warp capability could not be
    /// exercised.
    pub fn set_position(&self, position: PointerPosition) -> Result<(), CommandError> {
        debug!(x = position.x, y = position.y, "warping pointer");
        self.backend.pointer_write(position).map_err(|e| {
            warn!(backend = self.backend.name(), "pointer warp failed: {e}");
            CommandError::CursorSetFailure
        })
    }

    /// Enables or disables pointer confinement.
    ///
    /// Enabling while already grabbed releases the held confinement and
    /// acquires a fresh one, so two native grabs never coexist.  Disabling
    /// while not grabbed is a successful no-op.
    ///
    /// # Errors
    ///
    /// [`CommandError::GrabFailure`] if the confinement cannot be acquired
    /// (including when no window handle is available) or its release fails.
    pub fn set_grabbing(&mut self, grab: bool) -> Result<(), CommandError> {
        if grab {
            self.grab()
        } else {
            self.ungrab()
        }
    }

    /// `true` while a confinement is held.
    pub fn is_grabbing(&self) -> bool {
        matches!(self.grab, GrabState::Grabbed(_))
    }

    fn grab(&mut self) -> Result<(), CommandError> {
        let Some(window) = self.windows.native_window() else {
            warn!("pointer grab requested but no window handle is available");
            return Err(CommandError::GrabFailure);
        };

        if let GrabState::Grabbed(previous) = std::mem::replace(&mut self.grab, GrabState::Ungrabbed) {
            debug!("replacing active pointer grab");
            if let Err(e) = previous.release() {
                warn!("releasing previous pointer grab failed: {e}");
            }
        }

        match self.backend.pointer_confine(window) {
            Ok(confinement) => {
                self.grab = GrabState::Grabbed(confinement);
                info!(backend = self.backend.name(), ?window, "pointer grabbed");
                Ok(())
            }
            Err(e) => {
                warn!(backend = self.backend.name(), ?window, "pointer grab failed: {e}");
                Err(CommandError::GrabFailure)
            }
        }
    }

    fn ungrab(&mut self) -> Result<(), CommandError> {
        match std::mem::replace(&mut self.grab, GrabState::Ungrabbed) {
            GrabState::Ungrabbed => {
                debug!("pointer ungrab requested with no active grab");
                Ok(())
            }
            GrabState::Grabbed(confinement) => match confinement.release() {
                Ok(()) => {
                    info!(backend = self.backend.name(), "pointer released");
                    Ok(())
                }
                Err(e) => {
                    warn!(backend = self.backend.name(), "pointer release failed: {e}");
                    Err(CommandError::GrabFailure)
                }
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
