//! Integration tests for the hostctl-core command surface.
//!
//! These tests drive the public API the way the agent's command adapter
//! does: parse a request line, decode the typed arguments, and shape a
//! response envelope, asserting on the exact JSON the caller sees.

use hostctl_core::{
    domain::introspection::{DisplayRecord, KernelRecord, KernelVariant, VersionQuad},
    protocol::{
        args::{normalise_data, SendKeyArgs, SetMouseGrabbingArgs, SetMousePositionArgs},
        payloads::{DisplayInfo, KernelInfo},
        request::{ReplyFrame, RequestFrame},
    },
    CommandError, KeyCode, KeyState, Operation, PointerPosition, Response,
};
use serde_json::{json, Value};

fn reply_json(id: Option<Value>, response: Response) -> Value {
    serde_json::from_str(&ReplyFrame::new(id, response).to_line()).expect("reply is valid JSON")
}

#[test]
fn test_set_mouse_position_request_missing_y_yields_missing_argument_reply() {
    // Arrange
    let frame = RequestFrame::parse_line(r#"{"id":1,"method":"setMousePosition","data":{"x":10}}"#)
        .expect("parse");
    assert_eq!(frame.method.parse::<Operation>(), Ok(Operation::SetMousePosition));

    // Act
    let result = SetMousePositionArgs::from_request(&normalise_data(frame.data));
    let reply = reply_json(frame.id, Response::from_result(result.map(|a| a.position)));

    // Assert
    assert_eq!(
        reply,
        json!({
            "id": 1,
            "error": { "code": "NE_RT_NATPRME", "message": "Missing parameter: y" }
        })
    );
}

#[test]
fn test_get_mouse_position_reply_shape() {
    let reply = reply_json(Some(json!(9)), Response::ok(PointerPosition::new(640, 480)));
    assert_eq!(
        reply,
        json!({ "id": 9, "success": true, "returnValue": { "x": 640, "y": 480 } })
    );
}

#[test]
fn test_set_mouse_grabbing_request_without_data_defaults_to_grab() {
    let frame = RequestFrame::parse_line(r#"{"method":"computer.setMouseGrabbing"}"#)
        .expect("parse");
    let args = SetMouseGrabbingArgs::from_request(&normalise_data(frame.data)).expect("decode");
    assert!(args.grabbing);
}

#[test]
fn test_send_key_request_with_unknown_state_decodes_as_press() {
    let frame = RequestFrame::parse_line(
        r#"{"method":"sendKey","data":{"keyCode":38,"keyState":"tap"}}"#,
    )
    .expect("parse");
    let args = SendKeyArgs::from_request(&normalise_data(frame.data)).expect("decode");
    assert_eq!(args.key_code, KeyCode(38));
    assert_eq!(args.key_state, KeyState::Press);
}

#[test]
fn test_successful_unit_operation_reply_has_no_return_value() {
    let reply = reply_json(None, Response::from_unit(Ok(())));
    assert_eq!(reply, json!({ "success": true }));
}

#[test]
fn test_failure_reply_omits_success_field() {
    let reply = reply_json(None, Response::err(&CommandError::CursorSetFailure));
    assert!(reply.get("success").is_none());
    assert_eq!(reply["error"]["message"], "Unable to set mouse cursor");
}

#[test]
fn test_display_array_reply_shape() {
    // Arrange
    let records = [
        DisplayRecord { width: 1920, height: 1080, dpi: 96, bpp: 32, refresh_rate: 60.0 },
        DisplayRecord { width: 3840, height: 2160, dpi: 163, bpp: 30, refresh_rate: 144.0 },
    ];
    let displays: Vec<DisplayInfo> = records
        .iter()
        .enumerate()
        .map(|(i, r)| DisplayInfo::from_record(i as u32, r))
        .collect();

    // Act
    let reply = reply_json(None, Response::ok(displays));

    // Assert
    let arr = reply["returnValue"].as_array().expect("array");
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["id"], 0);
    assert_eq!(arr[1]["id"], 1);
    assert_eq!(arr[1]["resolution"]["width"], 3840);
    assert_eq!(arr[1]["refreshRate"], 144.0);
}

#[test]
fn test_kernel_info_reply_shape() {
    let info = KernelInfo::from(KernelRecord {
        variant: KernelVariant::WindowsNt,
        version: VersionQuad::parse_lenient("10.0.22631.4460"),
    });
    let reply = reply_json(None, Response::ok(info));
    assert_eq!(
        reply["returnValue"],
        json!({ "variant": "Windows NT", "version": "10.0.22631-4460" })
    );
}

#[test]
fn test_unknown_method_reply() {
    let err = "reboot".parse::<Operation>().unwrap_err();
    let reply = reply_json(Some(json!("r1")), Response::err(&err));
    assert_eq!(reply["error"]["code"], "NE_RT_NATNTIM");
    assert_eq!(reply["id"], "r1");
}
