//! Infrastructure layer for the agent.
//!
//! Contains OS-facing adapters and the command surface.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `hostctl_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`backend`** – one [`CapabilityBackend`] per platform, selected at
//!   compile time with `#[cfg(target_os)]`, plus the unsupported fallback and
//!   an always-compiled recording mock.
//!
//! - **`system_info`** – memory / CPU / OS queries through `sysinfo` and
//!   per-platform display enumeration.
//!
//! - **`window_handle`** – the [`WindowHandleProvider`] fed from configuration.
//!
//! - **`config`** – TOML configuration file.
//!
//! - **`command_adapter`** – maps operation names and JSON arguments to the
//!   services and wraps every result in the response envelope.
//!
//! [`CapabilityBackend`]: crate::application::capability::CapabilityBackend
//! [`WindowHandleProvider`]: crate::application::pointer_control::WindowHandleProvider

pub mod backend;
pub mod command_adapter;
pub mod config;
pub mod system_info;
pub mod window_handle;
