//! Input-control value types shared by every capability backend.
//!
//! None of these types are cached anywhere: a [`PointerPosition`] is read
//! fresh from the OS on every query, and a [`KeyState`] describes a single
//! request rather than tracked key state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Absolute pointer location in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A platform-specific key code, passed through to the OS verbatim.
///
/// The meaning of the number depends on the active backend: a Windows
/// virtual-key code, a macOS `CGKeyCode`, or an X11 keycode.  No translation
/// between platforms is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u32);

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One half of a key transition: a single synthetic "pressed" or "released"
/// event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyTransition {
    Down,
    Up,
}

impl KeyTransition {
    /// `true` for [`KeyTransition::Down`].
    pub fn is_press(self) -> bool {
        matches!(self, KeyTransition::Down)
    }
}

/// The key state a caller asks for.
///
/// `Press` synthesizes a full key press (down, then up).  `Down` and `Up`
/// each synthesize exactly one half, which lets a caller hold a key across
/// several commands.  Nothing tracks which keys are held: a `Down` without a
/// matching `Up` leaves the key logically pressed at the OS level until the
/// caller releases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyState {
    #[default]
    Press,
    Down,
    Up,
}

impl KeyState {
    /// Parses a request value.  Anything other than `"press"`, `"down"`, or
    /// `"up"` falls back to [`KeyState::Press`].
    pub fn from_request_value(value: &str) -> Self {
        match value {
            "down" => KeyState::Down,
            "up" => KeyState::Up,
            "press" => KeyState::Press,
            other => {
                tracing::debug!("unrecognised keyState {other:?}; using press");
                KeyState::Press
            }
        }
    }

    /// The half transitions to inject, in order.
    pub fn transitions(self) -> &'static [KeyTransition] {
        match self {
            KeyState::Press => &[KeyTransition::Down, KeyTransition::Up],
            KeyState::Down => &[KeyTransition::Down],
            KeyState::Up => &[KeyTransition::Up],
        }
    }
}

/// Opaque reference to the caller-owning native window.
///
/// Supplied by the window-handle provider and consumed only by the backend
/// of the matching platform; a backend handed another platform's variant
/// rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "handle", rename_all = "lowercase")]
pub enum NativeWindow {
    /// A Win32 `HWND`.
    Win32(isize),
    /// An X11 window id.
    X11(u64),
    /// A Quartz window number (`CGWindowID`).
    Quartz(u32),
}

// ── Tests ─────────────────────────────────────────────────────────────────────
