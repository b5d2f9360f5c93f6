//! Window handle provider fed from configuration or by the embedding host.

use std::sync::RwLock;

use hostctl_core::NativeWindow;
use tracing::debug;

use crate::application::pointer_control::WindowHandleProvider;

/// Holds the native window confinement is scoped to.
///
/// Starts with the configured window (if any).  A host that creates its
/// window after startup calls [`StaticWindowHandle::set_window`].
#[derive(Debug, Default)]
pub struct StaticWindowHandle {
    window: RwLock<Option<NativeWindow>>,
}

impl StaticWindowHandle {
    pub fn new(window: Option<NativeWindow>) -> Self {
        Self {
            window: RwLock::new(window),
        }
    }

    /// Replaces the window.  An active grab keeps its original window until
    /// the next grab request.
    pub fn set_window(&self, window: Option<NativeWindow>) {
        debug!(?window, "window handle updated");
        *self.window.write().unwrap_or_else(|p| p.into_inner()) = window;
    }
}

impl WindowHandleProvider for StaticWindowHandle {
    fn native_window(&self) -> Option<NativeWindow> {
        *self.window.read().unwrap_or_else(|p| p.into_inner())
    }
}
