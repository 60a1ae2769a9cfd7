//! # Shared Types Crate
//!
//! Primitive identities used across the voting workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Address`, `Principal` and `Timestamp` are
//!   defined once and re-used by the voting core and the event bus.
//! - **Opaque Identity**: a `Principal` is whoever authorized an operation;
//!   an `Address` is a storage location. The two are never interchangeable.

pub mod entities;

pub use entities::*;
