//! X11 capability backend (Linux, FreeBSD).
//!
//! | Capability  | Xlib call                                        |
//! |-------------|--------------------------------------------------|
//! | read        | `XQueryPointer` on the default root window       |
//! | warp        | `XWarpPointer` to the root window + `XFlush`     |
//! | confinement | `XGrabPointer` confined to the window            |
//! | keys        | `XTestFakeKeyEvent` (XTest extension) + `XFlush` |
//!
//! Read, warp and key injection open a connection per call and close it
//! before returning, so nothing is shared between calls.
//!
//! The X server drops an active grab as soon as the grabbing client's
//! connection closes.  The grab therefore keeps its own connection, owned by
//! [`X11Grab`], open until the grab is released.
//!
//! Key codes are X keycodes (the server's hardware codes, not KeySyms) and
//! are forwarded unchanged.  The server ignores codes it does not map.
//!
//! If `DISPLAY` is unset or the server is unreachable, every capability fails
//! with [`BackendError::NoSession`].

use std::os::raw::{c_int, c_uint, c_ulong};
use std::ptr;

use hostctl_core::{KeyCode, KeyTransition, NativeWindow, PointerPosition};
use tracing::debug;
use x11::{xlib, xtest};

use crate::application::capability::{BackendError, CapabilityBackend, Confinement};

/// `CurrentTime`: let the server timestamp the request.
const CURRENT_TIME: c_ulong = 0;

/// Pointer events the grabbing client wants while the grab is held.
const GRAB_EVENT_MASK: c_uint =
    (xlib::ButtonPressMask | xlib::ButtonReleaseMask | xlib::PointerMotionMask) as c_uint;

/// An open Xlib connection, closed on drop.
struct Connection(*mut xlib::Display);

impl Connection {
    fn open() -> Result<Self, BackendError> {
        // SAFETY: a null name means "use $DISPLAY".  The result is checked
        // before use and closed exactly once in Drop.
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            let name = std::env::var("DISPLAY").unwrap_or_else(|_| "<unset>".to_string());
            return Err(BackendError::NoSession(format!("XOpenDisplay failed; DISPLAY={name}")));
        }
        Ok(Self(display))
    }

    fn raw(&self) -> *mut xlib::Display {
        self.0
    }

    fn root(&self) -> xlib::Window {
        // SAFETY: the display pointer is valid for the life of `self`.
        unsafe { xlib::XDefaultRootWindow(self.0) }
    }

    fn flush(&self) {
        // SAFETY: the display pointer is valid for the life of `self`.
        unsafe { xlib::XFlush(self.0) };
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        // SAFETY: opened in `open`, never closed elsewhere.
        unsafe { xlib::XCloseDisplay(self.0) };
    }
}

// SAFETY: a connection is only ever used by one thread at a time.  It is
// moved into the grab guard, which the pointer service owns exclusively.
unsafe impl Send for Connection {}

/// X11 implementation of [`CapabilityBackend`].
#[derive(Debug, Default)]
pub struct X11Backend;

impl X11Backend {
    pub fn new() -> Self {
        Self
    }
}

impl CapabilityBackend for X11Backend {
    fn name(&self) -> &'static str {
        "x11"
    }

    fn pointer_read(&self) -> Result<PointerPosition, BackendError> {
        let conn = Connection::open()?;
        let mut root_return: xlib::Window = 0;
        let mut child_return: xlib::Window = 0;
        let (mut root_x, mut root_y, mut win_x, mut win_y): (c_int, c_int, c_int, c_int) = (0, 0, 0, 0);
        let mut mask: c_uint = 0;

        // SAFETY: every out-pointer refers to a live local.
        let same_screen = unsafe {
            xlib::XQueryPointer(
                conn.raw(),
                conn.root(),
                &mut root_return,
                &mut child_return,
                &mut root_x,
                &mut root_y,
                &mut win_x,
                &mut win_y,
                &mut mask,
            )
        };
        Ok(queried_position(same_screen, root_return, root_x, root_y))
    }

    fn pointer_write(&self, position: PointerPosition) -> Result<(), BackendError> {
        let conn = Connection::open()?;
        debug!(x = position.x, y = position.y, "XWarpPointer");
        // SAFETY: valid display; src window `None` (0) means "from anywhere".
        unsafe {
            xlib::XWarpPointer(conn.raw(), 0, conn.root(), 0, 0, 0, 0, position.x, position.y);
        }
        conn.flush();
        Ok(())
    }

    fn pointer_confine(&self, window: NativeWindow) -> Result<Box<dyn Confinement>, BackendError> {
        let NativeWindow::X11(xid) = window else {
            return Err(BackendError::ForeignWindow(window));
        };
        let conn = Connection::open()?;
        let xid = xid as xlib::Window;

        // SAFETY: valid display; the server validates `xid` and reports a
        // status instead of failing the connection for unviewable windows.
        let status = unsafe {
            xlib::XGrabPointer(
                conn.raw(),
                xid,
                xlib::True,
                GRAB_EVENT_MASK,
                xlib::GrabModeAsync,
                xlib::GrabModeAsync,
                xid,
                0,
                CURRENT_TIME,
            )
        };
        if status != xlib::GrabSuccess {
            return Err(BackendError::native("XGrabPointer", grab_status_name(status)));
        }
        conn.flush();
        debug!(window = xid, "pointer grabbed");
        Ok(Box::new(X11Grab { conn: Some(conn) }))
    }

    fn key_inject(&self, code: KeyCode, transition: KeyTransition) -> Result<(), BackendError> {
        let conn = Connection::open()?;
        let is_press = if transition.is_press() { xlib::True } else { xlib::False };
        // SAFETY: valid display; XTest validates the keycode server-side.
        let ok = unsafe { xtest::XTestFakeKeyEvent(conn.raw(), code.0 as c_uint, is_press, CURRENT_TIME) };
        if ok == 0 {
            return Err(BackendError::native("XTestFakeKeyEvent", "XTest extension unavailable"));
        }
        conn.flush();
        Ok(())
    }
}

fn grab_status_name(status: c_int) -> &'static str {
    match status {
        xlib::AlreadyGrabbed => "AlreadyGrabbed",
        xlib::GrabInvalidTime => "GrabInvalidTime",
        xlib::GrabNotViewable => "GrabNotViewable",
        xlib::GrabFrozen => "GrabFrozen",
        _ => "unknown grab status",
    }
}

/// Active pointer grab.  Owns the connection that holds it.
struct X11Grab {
    conn: Option<Connection>,
}

impl X11Grab {
    fn ungrab(&mut self) {
        if let Some(conn) = self.conn.take() {
            // SAFETY: the connection is the one that took the grab.
            unsafe { xlib::XUngrabPointer(conn.raw(), CURRENT_TIME) };
            conn.flush();
            debug!("pointer ungrabbed");
        }
    }
}

impl Confinement for X11Grab {
    fn release(mut self: Box<Self>) -> Result<(), BackendError> {
        self.ungrab();
        Ok(())
    }
}

impl Drop for X11Grab {
    fn drop(&mut self) {
        self.ungrab();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// Pointer position from an `XQueryPointer` reply.
///
/// `False` only means the pointer is on another screen than the queried
/// root; the root coordinates are then relative to `root` and still valid.
fn queried_position(
    same_screen: xlib::Bool,
    root: xlib::Window,
    root_x: c_int,
    root_y: c_int,
) -> PointerPosition {
    if same_screen == xlib::False {
        debug!(root, "pointer is on another screen");
    }
    PointerPosition::new(root_x, root_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// With a display the read succeeds; without one it is a session error.
    #[test]
    fn test_x11_pointer_read_smoke() {
        let result = X11Backend::new().pointer_read();
        if std::env::var("DISPLAY").is_ok() {
            assert!(result.is_ok(), "pointer read must succeed when DISPLAY is set: {result:?}");
        } else {
            assert!(matches!(result, Err(BackendError::NoSession(_))));
        }
    }

    #[test]
    fn test_pointer_on_another_screen_still_reports_root_coordinates() {
        // Arrange – XQueryPointer answered False for a pointer on screen 1
        let (same_screen, root, x, y) = (xlib::False, 0x2a1, 640, 480);

        // Act
        let position = queried_position(same_screen, root, x, y);

        // Assert
        assert_eq!(position, PointerPosition::new(640, 480));
    }

    #[test]
    fn test_x11_confine_rejects_foreign_handle() {
        let result = X11Backend::new().pointer_confine(NativeWindow::Win32(1));
        assert!(matches!(result, Err(BackendError::ForeignWindow(_))));
    }

    #[test]
    fn test_grab_status_names() {
        assert_eq!(grab_status_name(xlib::GrabNotViewable), "GrabNotViewable");
        assert_eq!(grab_status_name(99), "unknown grab status");
    }
}
