//! Prometheus metrics for the voting core.
//!
//! All metrics follow the naming convention: `dao_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., votes_cast_total)
//! - **Gauge**: Value that can go up or down (e.g., proposal_locks)
//! - **Histogram**: Distribution of values (e.g., operation_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts,
    HistogramVec, Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // LIFECYCLE METRICS
    // =========================================================================

    /// Total proposals created
    pub static ref PROPOSALS_CREATED: Counter = Counter::new(
        "dao_proposals_created_total",
        "Total number of proposal records allocated"
    ).expect("metric creation failed");

    /// Total votes cast
    pub static ref VOTES_CAST: Counter = Counter::new(
        "dao_votes_cast_total",
        "Total number of vote receipts allocated"
    ).expect("metric creation failed");

    /// Total proposals finalized, by outcome
    pub static ref PROPOSALS_FINALIZED: CounterVec = CounterVec::new(
        Opts::new("dao_proposals_finalized_total", "Total number of proposals finalized"),
        &["outcome"]  // passed/rejected
    ).expect("metric creation failed");

    // =========================================================================
    // REJECTION METRICS
    // =========================================================================

    /// Rejected operations by operation and error kind
    pub static ref OPERATIONS_REJECTED: CounterVec = CounterVec::new(
        Opts::new("dao_operations_rejected_total", "Operations rejected by operation and reason"),
        &["operation", "reason"]
    ).expect("metric creation failed");

    // =========================================================================
    // COMMIT METRICS
    // =========================================================================

    /// Operation duration, from lock acquisition to commit
    pub static ref OPERATION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "dao_operation_duration_seconds",
            "Time spent executing a state transition"
        ).buckets(exponential_buckets(0.00001, 2.0, 16).expect("valid buckets")),
        &["operation"]
    ).expect("metric creation failed");

    /// Commit attempts rejected by the store and retried
    pub static ref COMMIT_RETRIES: Counter = Counter::new(
        "dao_commit_retries_total",
        "Compare-and-swap commits retried after a conflict"
    ).expect("metric creation failed");

    /// Live per-proposal serialization locks
    pub static ref PROPOSAL_LOCKS: Gauge = Gauge::new(
        "dao_proposal_locks",
        "Number of per-proposal locks currently held in the registry"
    ).expect("metric creation failed");
}

/// Handle proving the metrics were registered.
#[derive(Debug, Clone)]
pub struct MetricsHandle {
    registered: usize,
}

impl MetricsHandle {
    /// Number of collectors this call newly registered.
    pub fn registered(&self) -> usize {
        self.registered
    }
}

/// Register all metrics with the global registry.
///
/// Collectors that are already registered are skipped, so repeated calls
/// (several services in one process, or tests) succeed.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Lifecycle
        Box::new(PROPOSALS_CREATED.clone()),
        Box::new(VOTES_CAST.clone()),
        Box::new(PROPOSALS_FINALIZED.clone()),
        // Rejections
        Box::new(OPERATIONS_REJECTED.clone()),
        // Commit
        Box::new(OPERATION_DURATION.clone()),
        Box::new(COMMIT_RETRIES.clone()),
        Box::new(PROPOSAL_LOCKS.clone()),
    ];

    let mut registered = 0;
    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) => registered += 1,
            Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle { registered })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }

    /// Start a timer for one operation label of [`OPERATION_DURATION`].
    pub fn operation(operation: &str) -> Self {
        Self::new(&OPERATION_DURATION.with_label_values(&[operation]))
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::HistogramTimer::new(&$histogram)
    };
}
