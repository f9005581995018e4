//! Prometheus metrics for the cache lab.
//!
//! Metrics are exposed on a dedicated listener when `METRICS_PORT` is set.
//!
//! # Available Metrics
//!
//! ## Counters
//! - `edge_lab_middleware_decisions_total` - Middleware decisions (label: action)
//! - `edge_lab_upstream_requests_total` - Upstream fetches (labels: resource, outcome)
//! - `edge_lab_upstream_fallbacks_total` - Fetches replaced by a placeholder (label: resource)
//!
//! ## Histograms
//! - `edge_lab_upstream_duration_seconds` - Upstream fetch duration (label: resource)
//!
//! Recording is a no-op until an exporter is installed, so the functions
//! are safe to call from tests.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{error, info};

/// Metric names as constants for consistency.
pub mod names {
    pub const MIDDLEWARE_DECISIONS_TOTAL: &str = "edge_lab_middleware_decisions_total";
    pub const UPSTREAM_REQUESTS_TOTAL: &str = "edge_lab_upstream_requests_total";
    pub const UPSTREAM_FALLBACKS_TOTAL: &str = "edge_lab_upstream_fallbacks_total";
    pub const UPSTREAM_DURATION_SECONDS: &str = "edge_lab_upstream_duration_seconds";
}

/// Install the Prometheus exporter listening on `metrics_addr`.
///
/// # Errors
///
/// Returns a message if the exporter cannot be installed (e.g. port in use).
pub fn init_metrics(metrics_addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(
        names::MIDDLEWARE_DECISIONS_TOTAL,
        "Requests classified by the edge middleware"
    );
    describe_counter!(
        names::UPSTREAM_REQUESTS_TOTAL,
        "Requests sent to the upstream JSON API"
    );
    describe_counter!(
        names::UPSTREAM_FALLBACKS_TOTAL,
        "Upstream failures replaced by a placeholder value"
    );
    describe_histogram!(
        names::UPSTREAM_DURATION_SECONDS,
        "Upstream fetch duration in seconds"
    );

    info!(addr = %metrics_addr, "Prometheus metrics endpoint started");
    Ok(())
}

/// Try to initialize metrics, logging any errors but not failing.
pub fn try_init_metrics(metrics_addr: SocketAddr) {
    if let Err(e) = init_metrics(metrics_addr) {
        error!(error = %e, "Failed to initialize metrics, continuing without metrics");
    }
}

/// Record a middleware decision.
pub fn record_middleware_decision(action: &'static str) {
    counter!(names::MIDDLEWARE_DECISIONS_TOTAL, "action" => action).increment(1);
}

/// Record an upstream fetch and its duration.
pub fn record_upstream_fetch(resource: String, outcome: &'static str, elapsed: Duration) {
    counter!(names::UPSTREAM_REQUESTS_TOTAL, "resource" => resource.clone(), "outcome" => outcome)
        .increment(1);
    histogram!(names::UPSTREAM_DURATION_SECONDS, "resource" => resource)
        .record(elapsed.as_secs_f64());
}

/// Record a fetch that degraded to its placeholder.
pub fn record_fallback(resource: String) {
    counter!(names::UPSTREAM_FALLBACKS_TOTAL, "resource" => resource).increment(1);
}
