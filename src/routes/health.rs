use crate::{
    error::AppError,
    health::{HealthStatus, OverallHealthResponse},
    server::Server,
};
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HealthCheckQuery {
    /// `all`, or the name of a single component such as `database`
    #[serde(default)]
    pub check: Option<String>,
}

pub fn create_health_routes() -> Router<Server> {
    Router::new().route("/", get(health_check))
}

/// Aggregated health of the registered components
#[utoipa::path(
    get,
    path = "/health",
    summary = "Health Check",
    tags = ["Health"],
    params(HealthCheckQuery),
    responses(
        (status = 200, description = "Healthy or degraded", body = OverallHealthResponse),
        (status = 503, description = "At least one component is unhealthy", body = OverallHealthResponse)
    )
)]
pub async fn health_check(
    State(server): State<Server>,
    Query(params): Query<HealthCheckQuery>,
) -> Result<(StatusCode, Json<OverallHealthResponse>), AppError> {
    let response = server
        .health_service
        .check_health(params.check.as_deref())
        .await;

    let status = match response.status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
    };

    Ok((status, Json(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestServerBuilder;
    use axum::{
        body::{Body, to_bytes},
        http::Request,
    };
    use tower::ServiceExt;

    async fn check(uri: &str) -> (StatusCode, serde_json::Value) {
        let server = TestServerBuilder::new().build().await;
        let app = create_health_routes().with_state(server);

        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_check_basic() {
        let (status, body) = check("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["summary"]["total_checks"], 0);
    }

    #[tokio::test]
    async fn test_health_check_all_includes_database() {
        let (status, body) = check("/?check=all").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"]["database"]["status"], "healthy");
    }

    #[tokio::test]
    async fn test_health_check_unknown_component() {
        let (status, body) = check("/?check=unknown").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["total_checks"], 0);
    }
}
