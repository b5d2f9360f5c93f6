//! Windows capability backend.
//!
//! - Pointer read / warp: `GetCursorPos` / `SetCursorPos`.
//! - Confinement: `ClipCursor` on the window's client rectangle, converted
//!   to screen coordinates with `ClientToScreen`.  Release is
//!   `ClipCursor(NULL)`.
//! - Keys: `SendInput` with a single `KEYBDINPUT`.  The key code is passed
//!   through as the virtual-key code; codes above `u16::MAX` are rejected.
//!
//! The clip rectangle is captured once at grab time.  Moving or resizing the
//! window afterwards does not move the clip.

#![cfg(target_os = "windows")]

use std::ffi::c_void;

use hostctl_core::{KeyCode, KeyTransition, NativeWindow, PointerPosition};
use tracing::debug;
use windows::Win32::Foundation::{HWND, POINT, RECT};
use windows::Win32::Graphics::Gdi::ClientToScreen;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP,
    VIRTUAL_KEY,
};
use windows::Win32::UI::WindowsAndMessaging::{
    ClipCursor, GetClientRect, GetCursorPos, IsWindow, SetCursorPos,
};

use crate::application::capability::{BackendError, CapabilityBackend, Confinement};

/// Windows implementation of [`CapabilityBackend`].
#[derive(Debug, Default)]
pub struct WindowsBackend;

impl WindowsBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CapabilityBackend for WindowsBackend {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn pointer_read(&self) -> Result<PointerPosition, BackendError> {
        let mut point = POINT::default();
        // SAFETY: `point` is a valid, writable POINT on the stack.
        unsafe { GetCursorPos(&mut point) }.map_err(|e| BackendError::native("GetCursorPos", e))?;
        Ok(PointerPosition::new(point.x, point.y))
    }

    fn pointer_write(&self, position: PointerPosition) -> Result<(), BackendError> {
        // SAFETY: SetCursorPos takes plain integers.
        unsafe { SetCursorPos(position.x, position.y) }
            .map_err(|e| BackendError::native("SetCursorPos", e))
    }

    fn pointer_confine(&self, window: NativeWindow) -> Result<Box<dyn Confinement>, BackendError> {
        let NativeWindow::Win32(handle) = window else {
            return Err(BackendError::ForeignWindow(window));
        };
        let hwnd = HWND(handle as *mut c_void);

        // SAFETY: IsWindow accepts any value and only reports validity.
        if !unsafe { IsWindow(hwnd) }.as_bool() {
            return Err(BackendError::native("IsWindow", format!("{handle:#x} is not a window")));
        }

        let clip = client_rect_on_screen(hwnd)?;
        // SAFETY: `clip` lives on the stack for the duration of the call.
        unsafe { ClipCursor(Some(&clip as *const RECT)) }.map_err(|e| BackendError::native("ClipCursor", e))?;
        debug!(
            left = clip.left,
            top = clip.top,
            right = clip.right,
            bottom = clip.bottom,
            "cursor clipped"
        );
        Ok(Box::new(ClipGuard { active: true }))
    }

    fn key_inject(&self, code: KeyCode, transition: KeyTransition) -> Result<(), BackendError> {
        let vk = u16::try_from(code.0).map_err(|_| BackendError::InvalidKeyCode(code))?;
        let flags = match transition {
            KeyTransition::Down => KEYBD_EVENT_FLAGS(0),
            KeyTransition::Up => KEYEVENTF_KEYUP,
        };
        let input = INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(vk),
                    wScan: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };
        // SAFETY: `input` is a valid INPUT structure on the stack.
        let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
        if sent == 0 {
            return Err(BackendError::native(
                "SendInput",
                windows::core::Error::from_win32(),
            ));
        }
        Ok(())
    }
}

/// Client area of `hwnd` in screen coordinates.
fn client_rect_on_screen(hwnd: HWND) -> Result<RECT, BackendError> {
    let mut rect = RECT::default();
    // SAFETY: `rect` is a valid, writable RECT; `hwnd` was checked by IsWindow.
    unsafe { GetClientRect(hwnd, &mut rect) }.map_err(|e| BackendError::native("GetClientRect", e))?;

    let mut top_left = POINT { x: rect.left, y: rect.top };
    let mut bottom_right = POINT { x: rect.right, y: rect.bottom };
    // SAFETY: both points are valid, writable stack values.
    let converted = unsafe {
        ClientToScreen(hwnd, &mut top_left).as_bool() && ClientToScreen(hwnd, &mut bottom_right).as_bool()
    };
    if !converted {
        return Err(BackendError::native("ClientToScreen", "conversion failed"));
    }

    Ok(RECT {
        left: top_left.x,
        top: top_left.y,
        right: bottom_right.x,
        bottom: bottom_right.y,
    })
}

/// Holds the `ClipCursor` clip until released or dropped.
struct ClipGuard {
    active: bool,
}

impl ClipGuard {
    fn unclip(&mut self) -> Result<(), BackendError> {
        if !std::mem::take(&mut self.active) {
            return Ok(());
        }
        // SAFETY: passing no rectangle removes the clip.
        unsafe { ClipCursor(None) }.map_err(|e| BackendError::native("ClipCursor", e))
    }
}

impl Confinement for ClipGuard {
    fn release(mut self: Box<Self>) -> Result<(), BackendError> {
        self.unclip()
    }
}

impl Drop for ClipGuard {
    fn drop(&mut self) {
        let _ = self.unclip();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
