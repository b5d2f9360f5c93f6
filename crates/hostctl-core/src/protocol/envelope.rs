//! Response envelope and caller-visible error kinds.
//!
//! ```json
//! { "success": true, "returnValue": { "x": 10, "y": 20 } }
//! { "error": { "code": "NE_CO_UNLTOSC", "message": "Unable to set mouse cursor" } }
//! ```
//!
//! On success `returnValue` is omitted for operations with no payload.  On
//! failure `success` is omitted entirely.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error kinds surfaced to the caller.  None of them is process-fatal.
///
/// The fallback "unsupported platform" outcome has no kind of its own: it
/// surfaces as the failure kind of whichever capability was asked for, so a
/// caller cannot tell it apart from a transient OS failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// A required request field is absent.
    #[error("Missing parameter: {0}")]
    MissingArgument(String),

    /// A request field is present but has the wrong JSON type or range.
    #[error("Invalid value for parameter {field}: expected {expected}")]
    InvalidArgument {
        field: String,
        expected: &'static str,
    },

    /// The pointer-warp capability could not be exercised.
    #[error("Unable to set mouse cursor")]
    CursorSetFailure,

    /// Pointer confinement could not be acquired or released.
    #[error("Unable to set mouse grabbing")]
    GrabFailure,

    /// A native capability (key injection, pointer read) could not be exercised.
    #[error("Native method execution error occurred. Failed because of: {0}")]
    NativeRuntimeFailure(String),

    /// The requested method name is not part of the command surface.
    #[error("Native method not implemented: {0}")]
    UnknownOperation(String),
}

impl CommandError {
    /// Stable machine-readable code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::MissingArgument(_) => "NE_RT_NATPRME",
            CommandError::InvalidArgument { .. } => "NE_RT_INVARGT",
            CommandError::CursorSetFailure => "NE_CO_UNLTOSC",
            CommandError::GrabFailure => "NE_CO_UNLTOMG",
            CommandError::NativeRuntimeFailure(_) => "NE_RT_NATRTER",
            CommandError::UnknownOperation(_) => "NE_RT_NATNTIM",
        }
    }

    pub fn invalid(field: impl Into<String>, expected: &'static str) -> Self {
        CommandError::InvalidArgument {
            field: field.into(),
            expected,
        }
    }
}

/// The `error` object of a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

impl From<&CommandError> for ErrorPayload {
    fn from(err: &CommandError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Unified response envelope for every operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl Response {
    /// A successful response carrying `value` as `returnValue`.
    ///
    /// If `value` cannot be represented as JSON the response degrades to a
    /// `NativeRuntimeFailure` instead of panicking.
    pub fn ok<T: Serialize>(value: T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => Self {
                success: Some(true),
                return_value: Some(v),
                error: None,
            },
            Err(e) => Self::err(&CommandError::NativeRuntimeFailure(e.to_string())),
        }
    }

    /// A successful response with no `returnValue`.
    pub fn ok_empty() -> Self {
        Self {
            success: Some(true),
            return_value: None,
            error: None,
        }
    }

    /// A failed response.
    pub fn err(err: &CommandError) -> Self {
        Self {
            success: None,
            return_value: None,
            error: Some(err.into()),
        }
    }

    /// Builds a response from a service result.
    pub fn from_result<T: Serialize>(result: Result<T, CommandError>) -> Self {
        match result {
            Ok(v) => Self::ok(v),
            Err(e) => Self::err(&e),
        }
    }

    /// Builds a response from a service result with no payload.
    pub fn from_unit(result: Result<(), CommandError>) -> Self {
        match result {
            Ok(()) => Self::ok_empty(),
            Err(e) => Self::err(&e),
        }
    }

    /// `true` only when `success` is present and `true`.
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }

    /// The error code, if this is a failure.
    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
