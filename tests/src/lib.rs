//! # DAO Voting Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs      # Shared harness: store, oracle, clock, bus
//!     ├── lifecycle.rs     # End-to-end proposal lifecycle
//!     ├── concurrency.rs   # Races on one proposal under a multi-thread runtime
//!     └── telemetry.rs     # Metrics export after real operations
//!
//! benches/
//! └── voting_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p dao-voting-tests
//!
//! # By category
//! cargo test -p dao-voting-tests integration::concurrency
//!
//! # Benchmarks
//! cargo bench -p dao-voting-tests
//! ```

pub mod integration;
