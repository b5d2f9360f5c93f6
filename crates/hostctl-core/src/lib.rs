//! # hostctl-core
//!
//! Shared library for hostctl containing the domain types, the pointer clamp
//! used by confinement emulation, and the command envelope.
//!
//! This crate has zero dependencies on OS APIs.  Everything that touches a
//! native API lives in `hostctl-agent`.
//!
//! # Architecture overview
//!
//! hostctl exposes a small, uniform command surface over two kinds of OS
//! operations: host introspection (memory, CPU, kernel/OS identity, displays)
//! and synthetic input control (pointer read/warp, pointer confinement, key
//! synthesis).  A higher-level runtime issues JSON commands and receives JSON
//! replies; it never touches native APIs itself.
//!
//! - **`domain`** – Value types with no OS dependencies: pointer positions,
//!   window bounds and the clamp that keeps a pointer inside them, key codes
//!   and key states, native window references, and the raw introspection
//!   records produced by a system information provider.
//!
//! - **`protocol`** – How commands look on the wire: request framing,
//!   argument decoding, the `{success, returnValue}` / `{error}` response
//!   envelope, error kinds with their stable codes, and the response payload
//!   shapes for each operation.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `hostctl_core::PointerPosition` instead of the full module path.
pub use domain::input::{KeyCode, KeyState, KeyTransition, NativeWindow, PointerPosition};
pub use domain::confinement::{ClampOutcome, PointerClamp, WindowBounds};
pub use protocol::envelope::{CommandError, ErrorPayload, Response};
pub use protocol::operation::Operation;
