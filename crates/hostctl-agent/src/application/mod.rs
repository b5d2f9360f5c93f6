//! Application layer: the services behind each command.
//!
//! - **`capability`** – the [`capability::CapabilityBackend`] contract every
//!   platform backend satisfies (pointer read/write, pointer confinement, key
//!   injection), and the [`capability::Confinement`] resource a grab holds.
//!
//! - **`pointer_control`** – owns the process-wide grab state and routes
//!   pointer get/set/grab calls to the active backend.
//!
//! - **`key_synthesis`** – turns a key code plus press/down/up into one or two
//!   half transitions on the backend.
//!
//! - **`introspection`** – stateless queries over a system information
//!   provider, reshaped into response payloads.
//!
//! Services never panic and never let a backend fault escape: every failure
//! comes back as a [`hostctl_core::CommandError`].

pub mod capability;
pub mod introspection;
pub mod key_synthesis;
pub mod pointer_control;

#[cfg(test)]
pub(crate) mod test_support;
