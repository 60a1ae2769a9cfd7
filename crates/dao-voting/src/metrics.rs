//! # Voting Metrics
//!
//! Records into the Prometheus registry owned by `dao-telemetry`.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! dao-voting = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `dao_proposals_created_total` - Counter of proposals created
//! - `dao_votes_cast_total` - Counter of accepted votes
//! - `dao_proposals_finalized_total` - Counter of finalizations (by outcome)
//! - `dao_operations_rejected_total` - Counter of rejections (by operation, reason)
//! - `dao_operation_duration_seconds` - Histogram of transaction latency
//! - `dao_commit_retries_total` - Counter of compare-and-swap retries
//! - `dao_proposal_locks` - Gauge of live per-proposal locks, summed over services

#[cfg(feature = "metrics")]
use dao_telemetry::{
    HistogramTimer, COMMIT_RETRIES, OPERATIONS_REJECTED, PROPOSALS_CREATED,
    PROPOSALS_FINALIZED, PROPOSAL_LOCKS, VOTES_CAST,
};

/// Guard observing operation latency on drop.
#[cfg(feature = "metrics")]
pub struct OperationTimer(#[allow(dead_code)] HistogramTimer);

/// Guard observing operation latency on drop.
#[cfg(not(feature = "metrics"))]
pub struct OperationTimer;

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Start timing an operation
#[cfg(feature = "metrics")]
pub fn start_timer(operation: &'static str) -> OperationTimer {
    OperationTimer(HistogramTimer::operation(operation))
}

/// Record a proposal created
#[cfg(feature = "metrics")]
pub fn record_proposal_created() {
    PROPOSALS_CREATED.inc();
}

/// Record an accepted vote
#[cfg(feature = "metrics")]
pub fn record_vote_cast() {
    VOTES_CAST.inc();
}

/// Record a finalization with its outcome label
#[cfg(feature = "metrics")]
pub fn record_proposal_finalized(outcome: &str) {
    PROPOSALS_FINALIZED.with_label_values(&[outcome]).inc();
}

/// Record a rejected operation
#[cfg(feature = "metrics")]
pub fn record_rejection(operation: &str, reason: &str) {
    OPERATIONS_REJECTED
        .with_label_values(&[operation, reason])
        .inc();
}

/// Record a compare-and-swap retry
#[cfg(feature = "metrics")]
pub fn record_commit_retry() {
    COMMIT_RETRIES.inc();
}

/// Count a lock entry added to a registry
#[cfg(feature = "metrics")]
pub fn record_lock_registered() {
    PROPOSAL_LOCKS.inc();
}

/// Count a lock entry evicted from a registry
#[cfg(feature = "metrics")]
pub fn record_lock_evicted() {
    PROPOSAL_LOCKS.dec();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn start_timer(_operation: &'static str) -> OperationTimer {
    OperationTimer
}

#[cfg(not(feature = "metrics"))]
pub fn record_proposal_created() {}

#[cfg(not(feature = "metrics"))]
pub fn record_vote_cast() {}

#[cfg(not(feature = "metrics"))]
pub fn record_proposal_finalized(_outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_rejection(_operation: &str, _reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_commit_retry() {}

#[cfg(not(feature = "metrics"))]
pub fn record_lock_registered() {}

#[cfg(not(feature = "metrics"))]
pub fn record_lock_evicted() {}
