//! Fallback backend for platforms without a native implementation.
//!
//! Every capability fails with [`BackendError::Unsupported`], so each pointer
//! and keyboard command reports its normal failure code instead of
//! pretending to succeed.

use hostctl_core::{KeyCode, KeyTransition, NativeWindow, PointerPosition};

use crate::application::capability::{BackendError, CapabilityBackend, Confinement};

#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedBackend;

impl CapabilityBackend for UnsupportedBackend {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn pointer_read(&self) -> Result<PointerPosition, BackendError> {
        Err(BackendError::Unsupported)
    }

    fn pointer_write(&self, _position: PointerPosition) -> Result<(), BackendError> {
        Err(BackendError::Unsupported)
    }

    fn pointer_confine(&self, _window: NativeWindow) -> Result<Box<dyn Confinement>, BackendError> {
        Err(BackendError::Unsupported)
    }

    fn key_inject(&self, _code: KeyCode, _transition: KeyTransition) -> Result<(), BackendError> {
        Err(BackendError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_capability_fails() {
        let backend = UnsupportedBackend;
        assert!(matches!(backend.pointer_read(), Err(BackendError::Unsupported)));
        assert!(backend.pointer_write(PointerPosition::new(0, 0)).is_err());
        assert!(backend.pointer_confine(NativeWindow::X11(1)).is_err());
        assert!(backend.key_inject(KeyCode(65), KeyTransition::Down).is_err());
    }

    #[test]
    fn test_error_message_names_the_platform_gap() {
        let err = UnsupportedBackend.pointer_read().unwrap_err();
        assert_eq!(err.to_string(), "not supported on this platform");
    }
}
