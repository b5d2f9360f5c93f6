//! Domain layer: pure value types with no OS dependencies.
//!
//! - **`input`** – pointer positions, key codes, key states, and the opaque
//!   native window reference handed to the confinement backend.
//! - **`confinement`** – window bounds and the clamp computation that the
//!   event-interception callback runs for every pointer-moved event.
//! - **`introspection`** – raw records returned by a system information
//!   provider, plus the architecture / kernel / version normalisation rules.

pub mod confinement;
pub mod input;
pub mod introspection;
