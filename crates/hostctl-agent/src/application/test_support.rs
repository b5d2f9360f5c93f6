//! Recording backend shared by the application-layer unit tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use hostctl_core::{KeyCode, KeyTransition, NativeWindow, PointerPosition};

use super::capability::{BackendError, CapabilityBackend, Confinement};

/// Records every capability call.  Each `fail_*` switch makes the matching
/// capability fail with `NativeCall`.
#[derive(Default)]
pub(crate) struct RecordingBackend {
    pub position: Mutex<PointerPosition>,
    pub writes: Mutex<Vec<PointerPosition>>,
    pub keys: Mutex<Vec<(KeyCode, KeyTransition)>>,
    pub confines: Mutex<Vec<NativeWindow>>,
    /// Confinements currently held (acquired and not yet released or dropped).
    pub live: Arc<AtomicUsize>,
    pub releases: Arc<AtomicUsize>,
    pub fail_read: bool,
    pub fail_write: bool,
    pub fail_confine: bool,
    pub fail_release: bool,
    /// Fail only this half transition.
    pub fail_transition: Option<KeyTransition>,
}

impl RecordingBackend {
    pub fn live_confinements(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

struct RecordingConfinement {
    live: Arc<AtomicUsize>,
    releases: Arc<AtomicUsize>,
    fail_release: bool,
    held: bool,
}

impl Confinement for RecordingConfinement {
    fn release(mut self: Box<Self>) -> Result<(), BackendError> {
        self.held = false;
        self.live.fetch_sub(1, Ordering::SeqCst);
        self.releases.fetch_add(1, Ordering::SeqCst);
        if self.fail_release {
            return Err(BackendError::native("release", "injected failure"));
        }
        Ok(())
    }
}

impl Drop for RecordingConfinement {
    fn drop(&mut self) {
        if self.held {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl CapabilityBackend for RecordingBackend {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn pointer_read(&self) -> Result<PointerPosition, BackendError> {
        if self.fail_read {
            return Err(BackendError::native("pointer_read", "injected failure"));
        }
        Ok(*self.position.lock().unwrap())
    }

    fn pointer_write(&self, position: PointerPosition) -> Result<(), BackendError> {
        if self.fail_write {
            return Err(BackendError::NoSession("injected failure".into()));
        }
        self.writes.lock().unwrap().push(position);
        *self.position.lock().unwrap() = position;
        Ok(())
    }

    fn pointer_confine(&self, window: NativeWindow) -> Result<Box<dyn Confinement>, BackendError> {
        self.confines.lock().unwrap().push(window);
        if self.fail_confine {
            return Err(BackendError::native("pointer_confine", "injected failure"));
        }
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RecordingConfinement {
            live: Arc::clone(&self.live),
            releases: Arc::clone(&self.releases),
            fail_release: self.fail_release,
            held: true,
        }))
    }

    fn key_inject(&self, code: KeyCode, transition: KeyTransition) -> Result<(), BackendError> {
        if self.fail_transition == Some(transition) {
            return Err(BackendError::NoSession("injected failure".into()));
        }
        self.keys.lock().unwrap().push((code, transition));
        Ok(())
    }
}
