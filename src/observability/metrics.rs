//! Metrics collection and exposition.
//!
//! # Metrics
//! - `store_contract_calls_total` (counter): contract reads by operation, outcome
//! - `store_contract_call_duration_seconds` (histogram): read latency
//! - `store_transactions_total` (counter): submitted transactions by operation, outcome
//! - `store_view_transitions_total` (counter): view phase entries by phase
//!
//! Recording is a no-op until a recorder is installed, so library users and
//! tests pay nothing when metrics are disabled.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with an HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

fn outcome(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "error"
    }
}

/// Record a completed contract read.
pub fn record_contract_call(operation: &'static str, ok: bool, started: Instant) {
    metrics::counter!(
        "store_contract_calls_total",
        "operation" => operation,
        "outcome" => outcome(ok)
    )
    .increment(1);
    metrics::histogram!("store_contract_call_duration_seconds", "operation" => operation)
        .record(started.elapsed().as_secs_f64());
}

/// Record a transaction that reached a final outcome.
pub fn record_transaction(operation: &'static str, ok: bool) {
    metrics::counter!(
        "store_transactions_total",
        "operation" => operation,
        "outcome" => outcome(ok)
    )
    .increment(1);
}

/// Record the view controller entering a phase.
pub fn record_view_transition(phase: &'static str) {
    metrics::counter!("store_view_transitions_total", "phase" => phase).increment(1);
}
