//! Cross-crate integration tests

pub mod fixtures;

mod concurrency;
mod lifecycle;
mod telemetry;
