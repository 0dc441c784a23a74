use crate::utils::RequestIdExt;
use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;

/// Paths whose traffic is logged; everything else passes through silently
fn is_logged_path(path: &str) -> bool {
    path.starts_with("/api") || path.starts_with("/health")
}

/// Structured request/response logging middleware
pub async fn request_response_logger(req: Request<Body>, next: Next) -> Response {
    let path = req.uri().path().to_string();
    if !is_logged_path(&path) {
        return next.run(req).await;
    }

    let method = req.method().to_string();
    let request_id = req.extensions().request_id();
    let ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|connect_info| connect_info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    info!(
        method = %method,
        path = %path,
        ip = %ip,
        request_id = %request_id,
        "API request"
    );

    let start = Instant::now();
    let response = next.run(req).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        request_id = %request_id,
        "API response"
    );

    response
}
