//! # Shared Crypto - Hashing Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | BLAKE3 (derive-key) | Record address derivation |
//!
//! ## Security Properties
//!
//! - **Domain separation**: seeded hashes run in BLAKE3 derive-key mode under
//!   a caller-chosen context string.
//! - **Unambiguous seeds**: every seed is length-prefixed before hashing.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod hashing;

// Re-exports
pub use hashing::derive_seeded_hash;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
