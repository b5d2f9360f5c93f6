//! Key Synthesis Service: key code + press/down/up → backend half transitions.
//!
//! `Press` is two sequential backend calls (down, then up) with no delay in
//! between; it is not an atomic native primitive.  Whether a target OS
//! needs a pause between the two halves is a backend tuning concern.
//!
//! The service keeps no state.  It does not know which keys are held, so a
//! `Down` without a matching `Up` leaves the key pressed at the OS level
//! until the caller sends the `Up`.

use std::sync::Arc;

use hostctl_core::{CommandError, KeyCode, KeyState};
use tracing::{debug, warn};

use super::capability::CapabilityBackend;

pub struct KeySynthesisService {
    backend: Arc<dyn CapabilityBackend>,
}

impl KeySynthesisService {
    pub fn new(backend: Arc<dyn CapabilityBackend>) -> Self {
        Self { backend }
    }

    /// Injects the half transitions for `state`, in order.
    ///
    /// Key codes are forwarded verbatim; what the OS does with an invalid
    /// code is outside this service's control.
    ///
    /// # Errors
    ///
    /// [`CommandError::NativeRuntimeFailure`] if the backend cannot inject.
    /// For `Press`, a failed down transition means the up transition is not
    /// attempted.
    pub fn send_key(&self, code: KeyCode, state: KeyState) -> Result<(), CommandError> {
        debug!(%code, ?state, "synthesizing key");
        for &transition in state.transitions() {
            self.backend.key_inject(code, transition).map_err(|e| {
                warn!(backend = self.backend.name(), %code, ?transition, "key injection failed: {e}");
                CommandError::NativeRuntimeFailure(e.to_string())
            })?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::RecordingBackend;
    use hostctl_core::KeyTransition;

    fn make_service(backend: RecordingBackend) -> (KeySynthesisService, Arc<RecordingBackend>) {
        let backend = Arc::new(backend);
        (
            KeySynthesisService::new(Arc::clone(&backend) as Arc<dyn CapabilityBackend>),
            backend,
        )
    }

    #[test]
    fn test_down_injects_exactly_one_press() {
        let (service, backend) = make_service(RecordingBackend::default());
        service.send_key(KeyCode(38), KeyState::Down).unwrap();
        assert_eq!(
            *backend.keys.lock().unwrap(),
            vec![(KeyCode(38), KeyTransition::Down)]
        );
    }

    #[test]
    fn test_up_injects_exactly_one_release() {
        let (service, backend) = make_service(RecordingBackend::default());
        service.send_key(KeyCode(38), KeyState::Up).unwrap();
        assert_eq!(
            *backend.keys.lock().unwrap(),
            vec![(KeyCode(38), KeyTransition::Up)]
        );
    }

    #[test]
    fn test_press_is_equivalent_to_down_then_up() {
        // Arrange
        let (press_service, press_backend) = make_service(RecordingBackend::default());
        let (split_service, split_backend) = make_service(RecordingBackend::default());

        // Act
        press_service.send_key(KeyCode(0x41), KeyState::Press).unwrap();
        split_service.send_key(KeyCode(0x41), KeyState::Down).unwrap();
        split_service.send_key(KeyCode(0x41), KeyState::Up).unwrap();

        // Assert
        assert_eq!(
            *press_backend.keys.lock().unwrap(),
            *split_backend.keys.lock().unwrap()
        );
    }

    #[test]
    fn test_press_stops_after_failed_down() {
        // Arrange
        let (service, backend) = make_service(RecordingBackend {
            fail_transition: Some(KeyTransition::Down),
            ..Default::default()
        });

        // Act
        let result = service.send_key(KeyCode(1), KeyState::Press);

        // Assert
        assert_eq!(result.unwrap_err().code(), "NE_RT_NATRTER");
        assert!(backend.keys.lock().unwrap().is_empty());
    }

    #[test]
    fn test_press_reports_failed_up() {
        let (service, backend) = make_service(RecordingBackend {
            fail_transition: Some(KeyTransition::Up),
            ..Default::default()
        });
        assert!(service.send_key(KeyCode(1), KeyState::Press).is_err());
        assert_eq!(
            *backend.keys.lock().unwrap(),
            vec![(KeyCode(1), KeyTransition::Down)]
        );
    }

    #[test]
    fn test_failure_message_carries_backend_cause() {
        let (service, _) = make_service(RecordingBackend {
            fail_transition: Some(KeyTransition::Up),
            ..Default::default()
        });
        let err = service.send_key(KeyCode(1), KeyState::Up).unwrap_err();
        assert!(err.to_string().contains("injected failure"), "{err}");
    }
}
