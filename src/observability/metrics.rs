//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status
//! - `proxy_request_duration_seconds` (histogram): latency distribution
//! - `proxy_links_discovered_total` (counter): anchors found in HTML bodies
//! - `proxy_warm_fetches_total` (counter): warming fetches by outcome
//! - `proxy_stream_aborts_total` (counter): mid-stream failures by reason

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(err) => tracing::error!(error = %err, "failed to install metrics exporter"),
    }
}

/// Record one completed (or failed) proxied request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);
    histogram!("proxy_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record links discovered in one HTML response.
pub fn record_links_discovered(count: usize) {
    counter!("proxy_links_discovered_total").increment(count as u64);
}

/// Record the outcome of one background warming fetch.
pub fn record_warm_fetch(outcome: &'static str) {
    counter!("proxy_warm_fetches_total", "outcome" => outcome).increment(1);
}

/// Record a response stream that aborted after commitment.
pub fn record_stream_abort(reason: &'static str) {
    counter!("proxy_stream_aborts_total", "reason" => reason).increment(1);
}
