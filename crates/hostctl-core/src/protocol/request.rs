//! Line framing used by the stdio host.
//!
//! One request per line:
//!
//! ```json
//! {"id": 7, "method": "sendKey", "data": {"keyCode": 65}}
//! ```
//!
//! One reply per line, echoing `id` when the request carried one:
//!
//! ```json
//! {"id": 7, "success": true}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::envelope::{CommandError, Response};

/// One decoded request line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestFrame {
    /// Opaque correlation id, echoed back verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl RequestFrame {
    /// Parses one line.  A malformed line becomes a `NativeRuntimeFailure`.
    pub fn parse_line(line: &str) -> Result<Self, CommandError> {
        serde_json::from_str(line)
            .map_err(|e| CommandError::NativeRuntimeFailure(format!("malformed request: {e}")))
    }
}

/// One reply line: the response envelope plus the echoed `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub response: Response,
}

impl ReplyFrame {
    pub fn new(id: Option<Value>, response: Response) -> Self {
        Self { id, response }
    }

    /// Serializes the reply as a single JSON line (without the trailing newline).
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"error":{{"code":"NE_RT_NATRTER","message":"unserializable reply: {}"}}}}"#,
                e.to_string().replace('"', "'")
            )
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_line_reads_id_method_and_data() {
        // Arrange
        let line = r#"{"id": 3, "method": "setMousePosition", "data": {"x": 1, "y": 2}}"#;

        // Act
        let frame = RequestFrame::parse_line(line).expect("parse");

        // Assert
        assert_eq!(frame.id, Some(json!(3)));
        assert_eq!(frame.method, "setMousePosition");
        assert_eq!(frame.data, Some(json!({ "x": 1, "y": 2 })));
    }

    #[test]
    fn test_parse_line_without_data_or_id() {
        let frame = RequestFrame::parse_line(r#"{"method": "getArch"}"#).expect("parse");
        assert_eq!(frame.id, None);
        assert_eq!(frame.data, None);
    }

    #[test]
    fn test_parse_line_malformed_is_native_runtime_failure() {
        let err = RequestFrame::parse_line("{not json").unwrap_err();
        assert_eq!(err.code(), "NE_RT_NATRTER");
    }

    #[test]
    fn test_reply_line_flattens_envelope_and_echoes_id() {
        // Arrange
        let reply = ReplyFrame::new(Some(json!("abc")), Response::ok(json!("x64")));

        // Act
        let v: Value = serde_json::from_str(&reply.to_line()).expect("valid json");

        // Assert
        assert_eq!(v, json!({ "id": "abc", "success": true, "returnValue": "x64" }));
    }

    #[test]
    fn test_reply_line_without_id_omits_it() {
        let reply = ReplyFrame::new(None, Response::err(&CommandError::GrabFailure));
        let v: Value = serde_json::from_str(&reply.to_line()).expect("valid json");
        assert!(v.get("id").is_none());
        assert_eq!(v["error"]["code"], "NE_CO_UNLTOMG");
    }
}
