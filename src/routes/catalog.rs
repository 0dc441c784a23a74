use crate::{
    database::entities::{CustomerRecord, ServiceRecord},
    error::AppError,
    routes::ApiErrorResponse,
    server::Server,
};
use axum::{
    Router,
    extract::{Path, State},
    response::Json,
    routing::get,
};

pub fn create_catalog_routes() -> Router<Server> {
    Router::new()
        .route("/customers/{id}", get(get_customer))
        .route("/services", get(list_services))
}

/// Look up a customer
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    summary = "Get Customer",
    tags = ["Catalog"],
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer", body = CustomerRecord),
        (status = 404, description = "Customer not found", body = ApiErrorResponse),
        (status = 500, description = "Database error", body = ApiErrorResponse)
    )
)]
pub async fn get_customer(
    State(server): State<Server>,
    Path(id): Path<i32>,
) -> Result<Json<CustomerRecord>, AppError> {
    server
        .database
        .customers()
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))
}

/// The service catalog
#[utoipa::path(
    get,
    path = "/api/services",
    summary = "List Services",
    tags = ["Catalog"],
    responses(
        (status = 200, description = "All services ordered by ID", body = Vec<ServiceRecord>),
        (status = 500, description = "Database error", body = ApiErrorResponse)
    )
)]
pub async fn list_services(
    State(server): State<Server>,
) -> Result<Json<Vec<ServiceRecord>>, AppError> {
    Ok(Json(server.database.services().list().await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entities::ServiceType;
    use crate::test_utils::{Fixture, TestServerBuilder};
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_get_customer_found_and_missing() {
        let server = TestServerBuilder::new().build().await;
        let id = Fixture::new(server.database.as_ref()).customer("Alice").await;
        let app = create_catalog_routes().with_state(server);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/customers/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["account_status"], "active");

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/customers/{}", id + 1))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Not found");
    }

    #[tokio::test]
    async fn test_list_services() {
        let server = TestServerBuilder::new().build().await;
        let fixture = Fixture::new(server.database.as_ref());
        fixture.service("Basic TV Package", ServiceType::Tv, 19.5).await;
        fixture.service("Fiber Optic 1Gbps", ServiceType::Internet, 99.0).await;
        let app = create_catalog_routes().with_state(server);

        let response = app
            .oneshot(Request::builder().uri("/services").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let services = json.as_array().unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0]["service_type"], "tv");
        assert_eq!(services[1]["base_price"], 99.0);
    }
}
