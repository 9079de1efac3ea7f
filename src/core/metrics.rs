//! Prometheus metrics for monitoring the relay server.
//!
//! This module provides a centralized metrics registry for tracking HTTP
//! traffic, relay outcomes, and upstream latency.

use prometheus::{
    register_gauge_vec, register_histogram, register_histogram_vec, register_int_counter_vec,
    GaugeVec, Histogram, HistogramVec, IntCounterVec,
};
use std::sync::OnceLock;

/// Outcome label recorded when the relay returns a result.
pub const OUTCOME_SUCCESS: &str = "success";

/// Container for all application metrics.
pub struct Metrics {
    /// Total number of requests by method, endpoint, and status
    pub request_count: IntCounterVec,

    /// Request duration histogram in seconds
    pub request_duration: HistogramVec,

    /// Number of currently active requests by endpoint
    pub active_requests: GaugeVec,

    /// Relay outcomes: `success` or the failure kind
    pub relay_outcomes: IntCounterVec,

    /// Latency of the outbound Messages call in seconds
    pub upstream_latency: Histogram,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Initialize the metrics registry.
///
/// Subsequent calls return the same instance.
///
/// # Examples
///
/// ```no_run
/// use llm_relay::core::metrics::init_metrics;
///
/// let metrics = init_metrics();
/// metrics.relay_outcomes.with_label_values(&["success"]).inc();
/// ```
pub fn init_metrics() -> &'static Metrics {
    METRICS.get_or_init(|| {
        let request_count = register_int_counter_vec!(
            "llm_relay_requests_total",
            "Total number of requests",
            &["method", "endpoint", "status_code"]
        )
        .expect("Failed to register request_count metric");

        let request_duration = register_histogram_vec!(
            "llm_relay_request_duration_seconds",
            "Request duration in seconds",
            &["method", "endpoint"],
            vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]
        )
        .expect("Failed to register request_duration metric");

        let active_requests = register_gauge_vec!(
            "llm_relay_active_requests",
            "Number of active requests",
            &["endpoint"]
        )
        .expect("Failed to register active_requests metric");

        let relay_outcomes = register_int_counter_vec!(
            "llm_relay_outcomes_total",
            "Relay outcomes by result (success or failure kind)",
            &["outcome"]
        )
        .expect("Failed to register relay_outcomes metric");

        let upstream_latency = register_histogram!(
            "llm_relay_upstream_latency_seconds",
            "Upstream Messages API latency in seconds",
            vec![0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]
        )
        .expect("Failed to register upstream_latency metric");

        Metrics {
            request_count,
            request_duration,
            active_requests,
            relay_outcomes,
            upstream_latency,
        }
    })
}

/// Get the global metrics instance, initializing it on first use.
pub fn get_metrics() -> &'static Metrics {
    init_metrics()
}
