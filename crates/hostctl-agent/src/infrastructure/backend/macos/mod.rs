//! macOS capability backend.
//!
//! - Pointer read: location of a fresh `CGEvent` from a combined-session
//!   source.
//! - Warp: `CGWarpMouseCursorPosition`, followed by re-associating mouse
//!   and cursor so the next physical motion is not suppressed.
//! - Keys: `CGEventCreateKeyboardEvent` posted at the HID tap.  Key codes
//!   are virtual key codes (`CGKeyCode`, 16 bits).
//! - Confinement: an event tap that clamps pointer motion into the window;
//!   see [`event_tap`].
//!
//! Coordinates are global display coordinates with the origin at the
//! top-left of the main display.

#![cfg(target_os = "macos")]

pub mod event_tap;

use core_graphics::display::CGDisplay;
use core_graphics::event::{CGEvent, CGEventTapLocation};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;
use hostctl_core::{KeyCode, KeyTransition, NativeWindow, PointerPosition};
use tracing::debug;

use crate::application::capability::{BackendError, CapabilityBackend, Confinement};

pub use event_tap::pump_main_run_loop;

/// macOS implementation of [`CapabilityBackend`].
#[derive(Debug, Default)]
pub struct QuartzBackend;

impl QuartzBackend {
    pub fn new() -> Self {
        Self
    }
}

fn event_source(state: CGEventSourceStateID) -> Result<CGEventSource, BackendError> {
    CGEventSource::new(state).map_err(|()| BackendError::native("CGEventSourceCreate", "returned null"))
}

impl CapabilityBackend for QuartzBackend {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn pointer_read(&self) -> Result<PointerPosition, BackendError> {
        let source = event_source(CGEventSourceStateID::CombinedSessionState)?;
        let event = CGEvent::new(source).map_err(|()| BackendError::native("CGEventCreate", "returned null"))?;
        let location = event.location();
        Ok(PointerPosition::new(location.x as i32, location.y as i32))
    }

    fn pointer_write(&self, position: PointerPosition) -> Result<(), BackendError> {
        let point = CGPoint::new(f64::from(position.x), f64::from(position.y));
        debug!(x = position.x, y = position.y, "CGWarpMouseCursorPosition");
        CGDisplay::warp_mouse_cursor_position(point)
            .map_err(|code| BackendError::native("CGWarpMouseCursorPosition", format!("CGError {code}")))?;
        CGDisplay::associate_mouse_and_mouse_cursor_position(true).map_err(|code| {
            BackendError::native("CGAssociateMouseAndMouseCursorPosition", format!("CGError {code}"))
        })
    }

    fn pointer_confine(&self, window: NativeWindow) -> Result<Box<dyn Confinement>, BackendError> {
        let NativeWindow::Quartz(window_id) = window else {
            return Err(BackendError::ForeignWindow(window));
        };
        Ok(Box::new(event_tap::EventTap::install(window_id)?))
    }

    fn key_inject(&self, code: KeyCode, transition: KeyTransition) -> Result<(), BackendError> {
        let keycode = u16::try_from(code.0).map_err(|_| BackendError::InvalidKeyCode(code))?;
        let source = event_source(CGEventSourceStateID::HIDSystemState)?;
        let event = CGEvent::new_keyboard_event(source, keycode, transition.is_press())
            .map_err(|()| BackendError::native("CGEventCreateKeyboardEvent", "returned null"))?;
        event.post(CGEventTapLocation::HID);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
