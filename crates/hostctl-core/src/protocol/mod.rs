//! The command surface as seen by the calling runtime.
//!
//! # Request / response lifecycle
//!
//! ```text
//! {"id": 7, "method": "setMousePosition", "data": {"x": 10, "y": 20}}
//!        │
//!        ▼  request::RequestFrame  (framing)
//!        ▼  operation::Operation   (method name → typed operation)
//!        ▼  args::*                (data → typed arguments, MissingArgument on gaps)
//!        ▼  … one service call in hostctl-agent …
//!        ▼  envelope::Response     (typed result / CommandError → JSON)
//! {"id": 7, "success": true}
//! ```
//!
//! Every failure is a [`envelope::CommandError`] with a stable code; nothing
//! in this layer panics on caller input.

pub mod args;
pub mod envelope;
pub mod operation;
pub mod payloads;
pub mod request;
