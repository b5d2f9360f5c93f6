//! hostctl-agent library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/` and
//! the binary entry point in `main.rs` share the same module tree.
//!
//! The agent answers named commands from an embedding host:
//!
//! 1. Host introspection: memory, CPU, kernel, OS identity, attached displays.
//! 2. Pointer control: read and warp the pointer, confine it to the caller's
//!    window.
//! 3. Key synthesis: press, hold, or release a key by platform key code.
//!
//! Every command is answered with the JSON envelope defined in
//! `hostctl_core::protocol::envelope`.

/// Application layer: the capability contract and the three services.
pub mod application;

/// Infrastructure layer: OS backends, host queries, configuration, and the
/// command adapter.
pub mod infrastructure;
