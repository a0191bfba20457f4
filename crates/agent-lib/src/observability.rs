//! Observability infrastructure for the bridge.
//!
//! Prometheus metrics about the bridge itself (cycle latency, emitted
//! points, cycle failures); the forwarded metric stream goes through the
//! sink, not through here.

use prometheus::{register_histogram, register_int_gauge, Histogram, IntGauge};
use std::sync::OnceLock;

/// Histogram buckets for cycle latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<BridgeMetricsInner> = OnceLock::new();

struct BridgeMetricsInner {
    cycle_latency_seconds: Histogram,
    points_emitted: IntGauge,
    cycle_errors: IntGauge,
    containers_tracked: IntGauge,
}

impl BridgeMetricsInner {
    fn new() -> Self {
        Self {
            cycle_latency_seconds: register_histogram!(
                "metrics_bridge_cycle_latency_seconds",
                "Time spent running one polling cycle",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register cycle_latency_seconds"),

            points_emitted: register_int_gauge!(
                "metrics_bridge_points_emitted_total",
                "Total number of metric points dispatched to the sink"
            )
            .expect("Failed to register points_emitted"),

            cycle_errors: register_int_gauge!(
                "metrics_bridge_cycle_errors_total",
                "Total number of aborted polling cycles"
            )
            .expect("Failed to register cycle_errors"),

            containers_tracked: register_int_gauge!(
                "metrics_bridge_containers_tracked",
                "Number of containers emitted in the last cycle"
            )
            .expect("Failed to register containers_tracked"),
        }
    }
}

/// Bridge metrics for Prometheus exposition.
///
/// A lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct BridgeMetrics {
    _private: (),
}

impl Default for BridgeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(BridgeMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &BridgeMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_cycle_latency(&self, duration_secs: f64) {
        self.inner().cycle_latency_seconds.observe(duration_secs);
    }

    pub fn add_points_emitted(&self, count: i64) {
        self.inner().points_emitted.add(count);
    }

    pub fn inc_cycle_errors(&self) {
        self.inner().cycle_errors.inc();
    }

    pub fn set_containers_tracked(&self, count: i64) {
        self.inner().containers_tracked.set(count);
    }
}
