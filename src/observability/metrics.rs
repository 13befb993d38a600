//! Metrics collection and exposition.
//!
//! # Metrics
//! - `shopping_http_requests_total` (counter): requests by method, route, status
//! - `shopping_http_request_duration_seconds` (histogram): latency by method, route
//! - `shopping_version_conflicts_total` (counter): rejected writes by resource
//! - `shopping_not_modified_total` (counter): 304 responses by resource
//! - `shopping_lists` (gauge): lists currently held

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "shopping_http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!(
        "shopping_http_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a write rejected by `If-Match`.
pub fn record_version_conflict(resource: &'static str) {
    ::metrics::counter!("shopping_version_conflicts_total", "resource" => resource).increment(1);
}

/// Record a read answered with 304.
pub fn record_not_modified(resource: &'static str) {
    ::metrics::counter!("shopping_not_modified_total", "resource" => resource).increment(1);
}

/// Record the number of lists held.
pub fn record_list_count(count: usize) {
    ::metrics::gauge!("shopping_lists").set(count as f64);
}

/// Middleware recording request count and latency per matched route.
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
