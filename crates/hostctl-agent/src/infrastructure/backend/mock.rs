//! Mock capability backend.
//!
//! Replaces every OS call with in-memory recording so the full command
//! surface can be driven without a display, and so tests can assert exactly
//! which capability calls were made and in what order.
//!
//! Set `should_fail = true` to make every capability fail with
//! [`BackendError::NativeCall`].
//!
//! ```ignore
//! let backend = Arc::new(MockCapabilityBackend::new());
//! let keys = KeySynthesisService::new(backend.clone());
//! keys.send_key(KeyCode(65), KeyState::Press).unwrap();
//! assert_eq!(backend.key_events().len(), 2);
//! ```

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use hostctl_core::{KeyCode, KeyTransition, NativeWindow, PointerPosition};

use crate::application::capability::{BackendError, CapabilityBackend, Confinement};

/// A backend that records all calls without performing OS API calls.
#[derive(Default)]
pub struct MockCapabilityBackend {
    /// Current simulated pointer position; updated by every warp.
    pub position: Mutex<PointerPosition>,
    /// Every warp target, in call order.
    pub warps: Mutex<Vec<PointerPosition>>,
    /// Every injected half transition, in call order.
    pub keys: Mutex<Vec<(KeyCode, KeyTransition)>>,
    /// Every window a confinement was requested for.
    pub confinements: Mutex<Vec<NativeWindow>>,
    live: Arc<AtomicUsize>,
    /// When `true`, every capability returns an error.
    pub should_fail: bool,
}

impl MockCapabilityBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every capability fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Number of confinements acquired and not yet released.
    pub fn active_confinements(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn key_events(&self) -> Vec<(KeyCode, KeyTransition)> {
        lock(&self.keys).clone()
    }

    pub fn warp_targets(&self) -> Vec<PointerPosition> {
        lock(&self.warps).clone()
    }

    fn check(&self, call: &'static str) -> Result<(), BackendError> {
        if self.should_fail {
            return Err(BackendError::native(call, "mock failure"));
        }
        Ok(())
    }
}

// A poisoned record only means another test thread panicked mid-push.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Confinement handed out by [`MockCapabilityBackend`].
struct MockConfinement {
    live: Arc<AtomicUsize>,
    held: bool,
}

impl MockConfinement {
    fn end(&mut self) {
        if std::mem::take(&mut self.held) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Confinement for MockConfinement {
    fn release(mut self: Box<Self>) -> Result<(), BackendError> {
        self.end();
        Ok(())
    }
}

impl Drop for MockConfinement {
    fn drop(&mut self) {
        self.end();
    }
}

impl CapabilityBackend for MockCapabilityBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn pointer_read(&self) -> Result<PointerPosition, BackendError> {
        self.check("pointer_read")?;
        Ok(*lock(&self.position))
    }

    fn pointer_write(&self, position: PointerPosition) -> Result<(), BackendError> {
        self.check("pointer_write")?;
        lock(&self.warps).push(position);
        *lock(&self.position) = position;
        Ok(())
    }

    fn pointer_confine(&self, window: NativeWindow) -> Result<Box<dyn Confinement>, BackendError> {
        self.check("pointer_confine")?;
        lock(&self.confinements).push(window);
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockConfinement {
            live: Arc::clone(&self.live),
            held: true,
        }))
    }

    fn key_inject(&self, code: KeyCode, transition: KeyTransition) -> Result<(), BackendError> {
        self.check("key_inject")?;
        lock(&self.keys).push((code, transition));
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warp_updates_reported_position() {
        // Arrange
        let backend = MockCapabilityBackend::new();

        // Act
        backend.pointer_write(PointerPosition::new(12, 34)).unwrap();

        // Assert
        assert_eq!(backend.pointer_read().unwrap(), PointerPosition::new(12, 34));
        assert_eq!(backend.warp_targets(), vec![PointerPosition::new(12, 34)]);
    }

    #[test]
    fn test_confinement_counter_tracks_release_and_drop() {
        let backend = MockCapabilityBackend::new();

        let first = backend.pointer_confine(NativeWindow::X11(7)).unwrap();
        let second = backend.pointer_confine(NativeWindow::X11(7)).unwrap();
        assert_eq!(backend.active_confinements(), 2);

        first.release().unwrap();
        assert_eq!(backend.active_confinements(), 1);

        drop(second);
        assert_eq!(backend.active_confinements(), 0);
    }

    #[test]
    fn test_failing_backend_records_nothing() {
        let backend = MockCapabilityBackend::failing();
        assert!(backend.key_inject(KeyCode(1), KeyTransition::Down).is_err());
        assert!(backend.pointer_confine(NativeWindow::Quartz(3)).is_err());
        assert!(backend.key_events().is_empty());
        assert_eq!(backend.active_confinements(), 0);
    }
}
