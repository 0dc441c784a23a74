use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::{Duration, Instant};
use tracing::info;

/// Install the Prometheus recorder and serve `/metrics` on the given port
pub fn init_metrics_with_port(
    port: u16,
) -> Result<PrometheusHandle, Box<dyn std::error::Error + Send + Sync>> {
    let handle = PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .add_global_label("service", "payments_dashboard")
        .install_recorder()?;

    info!(port, "Metrics server started on :{}/metrics", port);
    Ok(handle)
}

/// Middleware to collect HTTP request metrics
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();

    let labels = [
        ("method", method),
        ("path", path),
        ("status", status.as_str().to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
    gauge!("http_requests_active").decrement(1.0);

    if status.is_server_error() {
        counter!("http_errors_total", &labels[..2]).increment(1);
    }

    response
}

/// Track a dashboard aggregation query
pub fn track_dashboard_query(query: &'static str, success: bool, duration: Duration) {
    let result = if success { "success" } else { "failure" };
    counter!("dashboard_queries_total", "query" => query, "result" => result).increment(1);
    histogram!("dashboard_query_duration_seconds", "query" => query)
        .record(duration.as_secs_f64());
}

/// Track rows written by the seeding facility
pub fn track_seeded_rows(table: &'static str, rows: u64) {
    counter!("seeded_rows_total", "table" => table).increment(rows);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_dashboard_query() {
        track_dashboard_query("recent_payments", true, Duration::from_millis(3));
        track_dashboard_query("service_stats", false, Duration::from_millis(40));
        // No recorder installed; must not panic
    }

    #[test]
    fn test_track_seeded_rows() {
        track_seeded_rows("payments", 1000);
        track_seeded_rows("customers", 0);
    }
}
