//! Command Adapter: the JSON command surface.
//!
//! Maps an operation name plus its JSON `data` object onto the services and
//! wraps every outcome in the response envelope.  This is the only place
//! where request fields are decoded and where [`CommandError`]s become
//! `{"error": {...}}` payloads.
//!
//! ```text
//! "setMousePosition", {"x":10,"y":20}
//!   └─ Operation::from_str ──▶ SetMousePositionArgs::from_request
//!        └─ PointerControlService::set_position ──▶ Response::from_unit
//! ```
//!
//! Every reply carries exactly one of `success` / `error`.  Nothing here
//! panics on caller input: unknown methods, missing fields and mistyped
//! fields all come back as typed failures.

use std::sync::Arc;

use hostctl_core::protocol::args::{
    normalise_data, SendKeyArgs, SetMouseGrabbingArgs, SetMousePositionArgs,
};
use hostctl_core::protocol::request::{ReplyFrame, RequestFrame};
use hostctl_core::{Operation, Response};
use serde_json::Value;
use tracing::debug;

use crate::application::capability::CapabilityBackend;
use crate::application::introspection::{IntrospectionService, SystemInfoProvider};
use crate::application::key_synthesis::KeySynthesisService;
use crate::application::pointer_control::{PointerControlService, WindowHandleProvider};

/// Routes named operations to the three services.
pub struct CommandAdapter {
    pointer: PointerControlService,
    keys: KeySynthesisService,
    introspection: IntrospectionService,
}

impl CommandAdapter {
    pub fn new(
        backend: Arc<dyn CapabilityBackend>,
        windows: Arc<dyn WindowHandleProvider>,
        system: Arc<dyn SystemInfoProvider>,
    ) -> Self {
        Self {
            pointer: PointerControlService::new(Arc::clone(&backend), windows),
            keys: KeySynthesisService::new(backend),
            introspection: IntrospectionService::new(system),
        }
    }

    /// `true` while a pointer confinement is held.
    pub fn is_grabbing(&self) -> bool {
        self.pointer.is_grabbing()
    }

    /// Executes `method` with `data` and returns its envelope.
    pub fn dispatch(&mut self, method: &str, data: Option<Value>) -> Response {
        let operation = match method.parse::<Operation>() {
            Ok(op) => op,
            Err(e) => {
                debug!(method, "unknown operation");
                return Response::err(&e);
            }
        };
        let input = normalise_data(data);
        debug!(%operation, "dispatching");

        match operation {
            Operation::GetMemoryInfo => Response::ok(self.introspection.memory_info()),
            Operation::GetArch => Response::ok(self.introspection.arch()),
            Operation::GetKernelInfo => Response::ok(self.introspection.kernel_info()),
            Operation::GetOsInfo => Response::ok(self.introspection.os_info()),
            Operation::GetCpuInfo => Response::ok(self.introspection.cpu_info()),
            Operation::GetDisplays => Response::ok(self.introspection.displays()),
            Operation::GetMousePosition => Response::from_result(self.pointer.get_position()),
            Operation::SetMousePosition => Response::from_unit(
                SetMousePositionArgs::from_request(&input)
                    .and_then(|args| self.pointer.set_position(args.position)),
            ),
            Operation::SetMouseGrabbing => Response::from_unit(
                SetMouseGrabbingArgs::from_request(&input)
                    .and_then(|args| self.pointer.set_grabbing(args.grabbing)),
            ),
            Operation::SendKey => Response::from_unit(
                SendKeyArgs::from_request(&input)
                    .and_then(|args| self.keys.send_key(args.key_code, args.key_state)),
            ),
        }
    }

    /// Handles one framed request line and returns the reply line.
    pub fn handle_line(&mut self, line: &str) -> String {
        let reply = match RequestFrame::parse_line(line) {
            Ok(frame) => {
                let response = self.dispatch(&frame.method, frame.data);
                ReplyFrame::new(frame.id, response)
            }
            Err(e) => ReplyFrame::new(None, Response::err(&e)),
        };
        reply.to_line()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::backend::{MockCapabilityBackend, UnsupportedBackend};
    use crate::infrastructure::system_info::FixedSystemInfo;
    use crate::infrastructure::window_handle::StaticWindowHandle;
    use hostctl_core::{KeyCode, KeyTransition, NativeWindow, PointerPosition};
    use serde_json::json;

    fn adapter_with(backend: Arc<dyn CapabilityBackend>, window: Option<NativeWindow>) -> CommandAdapter {
        CommandAdapter::new(
            backend,
            Arc::new(StaticWindowHandle::new(window)),
            Arc::new(FixedSystemInfo::workstation()),
        )
    }

    fn mock_adapter() -> (CommandAdapter, Arc<MockCapabilityBackend>) {
        let backend = Arc::new(MockCapabilityBackend::new());
        let adapter = adapter_with(backend.clone(), Some(NativeWindow::X11(9)));
        (adapter, backend)
    }

    #[test]
    fn test_set_mouse_position_missing_y_is_missing_argument() {
        // Arrange
        let (mut adapter, backend) = mock_adapter();

        // Act
        let response = adapter.dispatch("setMousePosition", Some(json!({ "x": 10 })));

        // Assert
        assert_eq!(response.error_code(), Some("NE_RT_NATPRME"));
        assert!(backend.warp_targets().is_empty());
    }

    #[test]
    fn test_set_mouse_position_warps() {
        let (mut adapter, backend) = mock_adapter();
        let response = adapter.dispatch("setMousePosition", Some(json!({ "x": 10, "y": 20 })));
        assert!(response.is_success());
        assert_eq!(backend.warp_targets(), vec![PointerPosition::new(10, 20)]);
    }

    #[test]
    fn test_get_mouse_position_returns_xy_object() {
        let (mut adapter, _) = mock_adapter();
        adapter.dispatch("setMousePosition", Some(json!({ "x": 5, "y": 6 })));
        let response = adapter.dispatch("getMousePosition", None);
        assert_eq!(response.return_value, Some(json!({ "x": 5, "y": 6 })));
    }

    #[test]
    fn test_grabbing_defaults_to_true() {
        let (mut adapter, backend) = mock_adapter();
        let response = adapter.dispatch("setMouseGrabbing", Some(json!({})));
        assert!(response.is_success());
        assert!(adapter.is_grabbing());
        assert_eq!(backend.active_confinements(), 1);
    }

    #[test]
    fn test_grabbing_without_window_is_grab_failure() {
        let backend = Arc::new(MockCapabilityBackend::new());
        let mut adapter = adapter_with(backend, None);
        let response = adapter.dispatch("setMouseGrabbing", Some(json!({ "grabbing": true })));
        assert_eq!(response.error_code(), Some("NE_CO_UNLTOMG"));
    }

    #[test]
    fn test_send_key_unknown_state_is_press() {
        let (mut adapter, backend) = mock_adapter();
        let response = adapter.dispatch("sendKey", Some(json!({ "keyCode": 65, "keyState": "sideways" })));
        assert!(response.is_success());
        assert_eq!(
            backend.key_events(),
            vec![(KeyCode(65), KeyTransition::Down), (KeyCode(65), KeyTransition::Up)]
        );
    }

    #[test]
    fn test_send_key_without_code_is_missing_argument() {
        let (mut adapter, _) = mock_adapter();
        let response = adapter.dispatch("sendKey", None);
        assert_eq!(response.error_code(), Some("NE_RT_NATPRME"));
    }

    #[test]
    fn test_namespaced_method_is_accepted() {
        let (mut adapter, _) = mock_adapter();
        let response = adapter.dispatch("computer.getArch", None);
        assert_eq!(response.return_value, Some(json!("x64")));
    }

    #[test]
    fn test_unknown_method_is_reported() {
        let (mut adapter, _) = mock_adapter();
        let response = adapter.dispatch("reboot", None);
        assert_eq!(response.error_code(), Some("NE_RT_NATNTIM"));
        assert_eq!(response.success, None);
    }

    #[test]
    fn test_unsupported_backend_fails_pointer_commands_with_their_codes() {
        // Arrange
        let mut adapter = adapter_with(Arc::new(UnsupportedBackend), Some(NativeWindow::X11(1)));

        // Act / Assert
        assert_eq!(
            adapter.dispatch("setMousePosition", Some(json!({ "x": 0, "y": 0 }))).error_code(),
            Some("NE_CO_UNLTOSC")
        );
        assert_eq!(adapter.dispatch("setMouseGrabbing", None).error_code(), Some("NE_CO_UNLTOMG"));
        assert_eq!(
            adapter.dispatch("sendKey", Some(json!({ "keyCode": 1 }))).error_code(),
            Some("NE_RT_NATRTER")
        );
        assert_eq!(adapter.dispatch("getMousePosition", None).error_code(), Some("NE_RT_NATRTER"));
        // Introspection does not depend on the backend.
        assert!(adapter.dispatch("getMemoryInfo", None).is_success());
    }

    #[test]
    fn test_handle_line_echoes_id() {
        let (mut adapter, _) = mock_adapter();
        let line = adapter.handle_line(r#"{"id":"a1","method":"getArch"}"#);
        let reply: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(reply, json!({ "id": "a1", "success": true, "returnValue": "x64" }));
    }

    #[test]
    fn test_handle_line_malformed_json_is_runtime_failure_without_id() {
        let (mut adapter, _) = mock_adapter();
        let line = adapter.handle_line("{not json");
        let reply: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(reply["error"]["code"], "NE_RT_NATRTER");
        assert!(reply.get("id").is_none());
        assert!(reply.get("success").is_none());
    }
}
