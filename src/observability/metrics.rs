//! Metrics collection and exposition.
//!
//! # Metrics
//! - `midway_requests_total` (counter): requests by method, status
//! - `midway_request_duration_seconds` (histogram): latency by method
//! - `midway_handler_failures_total` (counter): handler errors and panics
//! - `midway_identity_failures_total` (counter): identity lookups that errored
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op (tests, metrics disabled)
//! - Prometheus exposition is optional and bound to its own address

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, started: Instant) {
    counter!(
        "midway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("midway_request_duration_seconds", "method" => method.to_string())
        .record(started.elapsed().as_secs_f64());
}

pub fn record_handler_failure() {
    counter!("midway_handler_failures_total").increment(1);
}

pub fn record_identity_failure() {
    counter!("midway_identity_failures_total").increment(1);
}
