//! Typed request arguments and the decoding rules for them.
//!
//! Each operation that takes input has a `*Args` struct with a
//! `from_request` constructor.  Required fields are checked in declaration
//! order so the first absent field is the one named in the
//! [`CommandError::MissingArgument`].
//!
//! A field that is present but JSON `null` counts as missing.

use serde_json::{Map, Value};

use crate::domain::input::{KeyCode, KeyState, PointerPosition};
use crate::protocol::envelope::CommandError;

/// Returns the first field in `required` that is absent (or `null`) in `input`.
pub fn missing_required_field<'a>(input: &Value, required: &[&'a str]) -> Option<&'a str> {
    required
        .iter()
        .copied()
        .find(|field| !has_field(input, field))
}

/// `true` if `input` is an object with a non-null `field`.
pub fn has_field(input: &Value, field: &str) -> bool {
    input.get(field).is_some_and(|v| !v.is_null())
}

/// Reads an integer field.  JSON floats are truncated toward zero.
fn integer_field(input: &Value, field: &str) -> Result<i64, CommandError> {
    let value = input.get(field).ok_or_else(|| CommandError::MissingArgument(field.into()))?;
    if let Some(i) = value.as_i64() {
        return Ok(i);
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
            Ok(f.trunc() as i64)
        }
        _ => Err(CommandError::invalid(field, "integer")),
    }
}

fn i32_field(input: &Value, field: &str) -> Result<i32, CommandError> {
    let raw = integer_field(input, field)?;
    i32::try_from(raw).map_err(|_| CommandError::invalid(field, "32-bit integer"))
}

/// Arguments of `setMousePosition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetMousePositionArgs {
    pub position: PointerPosition,
}

impl SetMousePositionArgs {
    pub fn from_request(input: &Value) -> Result<Self, CommandError> {
        if let Some(field) = missing_required_field(input, &["x", "y"]) {
            return Err(CommandError::MissingArgument(field.into()));
        }
        Ok(Self {
            position: PointerPosition::new(i32_field(input, "x")?, i32_field(input, "y")?),
        })
    }
}

/// Arguments of `setMouseGrabbing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetMouseGrabbingArgs {
    /// Defaults to `true` when absent.
    pub grabbing: bool,
}

impl SetMouseGrabbingArgs {
    pub fn from_request(input: &Value) -> Result<Self, CommandError> {
        if !has_field(input, "grabbing") {
            return Ok(Self { grabbing: true });
        }
        input["grabbing"]
            .as_bool()
            .map(|grabbing| Self { grabbing })
            .ok_or_else(|| CommandError::invalid("grabbing", "boolean"))
    }
}

/// Arguments of `sendKey`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendKeyArgs {
    pub key_code: KeyCode,
    /// Defaults to [`KeyState::Press`]; unrecognised values also map to it.
    pub key_state: KeyState,
}

impl SendKeyArgs {
    pub fn from_request(input: &Value) -> Result<Self, CommandError> {
        if let Some(field) = missing_required_field(input, &["keyCode"]) {
            return Err(CommandError::MissingArgument(field.into()));
        }
        let raw = integer_field(input, "keyCode")?;
        let code = u32::try_from(raw)
            .map_err(|_| CommandError::invalid("keyCode", "non-negative 32-bit integer"))?;
        let key_state = input
            .get("keyState")
            .and_then(Value::as_str)
            .map(KeyState::from_request_value)
            .unwrap_or_default();
        Ok(Self {
            key_code: KeyCode(code),
            key_state,
        })
    }
}

/// Normalises request `data` into an object so field lookups never panic.
///
/// `null` or a missing `data` becomes `{}`; any other non-object value is kept
/// as-is (field lookups on it simply find nothing).
pub fn normalise_data(data: Option<Value>) -> Value {
    match data {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(v) => v,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
