//! Metrics collection and exposition.
//!
//! # Metrics
//! - `discovery_refresh_total` (counter): refresh passes by source, outcome
//! - `discovery_refresh_errors_total` (counter): failed refreshes by source
//! - `discovery_cached_resources` (gauge): cached record count by source
//! - `discovery_requests_total` (counter): served queries by kind, status
//! - `discovery_request_duration_seconds` (histogram): query latency by kind
//!
//! # Design Decisions
//! - The `metrics` facade keeps recording sites cheap; the Prometheus
//!   exporter is optional and config-gated

use std::net::SocketAddr;
use std::path::Path;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Prometheus exporter started"),
        Err(error) => tracing::error!(%error, "Failed to start Prometheus exporter"),
    }
}

/// Record one refresh pass for a source.
pub fn record_refresh(path: &Path, reloaded: bool) {
    let outcome = if reloaded { "reloaded" } else { "unchanged" };
    counter!(
        "discovery_refresh_total",
        "path" => path.display().to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a failed refresh for a source.
pub fn record_refresh_error(path: &Path) {
    counter!(
        "discovery_refresh_errors_total",
        "path" => path.display().to_string()
    )
    .increment(1);
}

/// Record the cached record count for a source.
pub fn record_cache_size(path: &Path, resources: usize) {
    gauge!(
        "discovery_cached_resources",
        "path" => path.display().to_string()
    )
    .set(resources as f64);
}

/// Record one served query.
pub fn record_query(kind: &'static str, status: &'static str, started: Instant) {
    counter!(
        "discovery_requests_total",
        "kind" => kind,
        "status" => status
    )
    .increment(1);
    histogram!("discovery_request_duration_seconds", "kind" => kind)
        .record(started.elapsed().as_secs_f64());
}
