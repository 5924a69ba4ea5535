//! Metrics collection and exposition.
//!
//! # Metrics
//! - `settlements_total` (counter): settlement attempts by outcome
//! - `rental_transitions_total` (counter): rental status transitions
//! - `chain_requests_total` (counter): chain RPC calls by method, result
//! - `chain_rpc_healthy` (gauge): 1=reachable, 0=unreachable
//! - `http_requests_total` (counter): requests by method, status
//! - `http_request_duration_seconds` (histogram): latency distribution

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter on its own listener and register
/// metric descriptions. Failure to start the exporter degrades to
/// logging only; it never takes the service down.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_counter!("settlements_total", "Settlement attempts by outcome");
            describe_counter!("rental_transitions_total", "Rental status transitions");
            describe_counter!("chain_requests_total", "Chain RPC calls by method and result");
            describe_gauge!("chain_rpc_healthy", "Whether the chain RPC is reachable");
            describe_counter!("http_requests_total", "HTTP requests by method and status");
            describe_histogram!(
                "http_request_duration_seconds",
                "HTTP request latency in seconds"
            );
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to start metrics exporter");
        }
    }
}

pub fn record_settlement(outcome: &str) {
    counter!("settlements_total", "outcome" => outcome.to_string()).increment(1);
}

pub fn record_rental_transition(to: &str) {
    counter!("rental_transitions_total", "to" => to.to_string()).increment(1);
}

pub fn record_chain_call(method: &str, ok: bool) {
    let result = if ok { "ok" } else { "error" };
    counter!("chain_requests_total", "method" => method.to_string(), "result" => result)
        .increment(1);
}

pub fn record_chain_health(healthy: bool) {
    gauge!("chain_rpc_healthy").set(if healthy { 1.0 } else { 0.0 });
}

pub fn record_http_request(method: &str, status: u16, start: Instant) {
    counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("http_request_duration_seconds").record(start.elapsed().as_secs_f64());
}
