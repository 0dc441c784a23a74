use crate::server::Server;
use axum::{Json, Router, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payments Dashboard API",
        version = "1.0.0",
        description = "Read-only analytics over customers, services, purchases and payments"
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::dashboard::get_dashboard,
        crate::routes::dashboard::get_recent_payments,
        crate::routes::dashboard::get_service_stats,
        crate::routes::dashboard::get_top_customers,
        crate::routes::catalog::get_customer,
        crate::routes::catalog::list_services,
    ),
    components(
        schemas(
            crate::routes::ApiErrorResponse,
            crate::health::OverallHealthResponse,
            crate::health::HealthStatus,
            crate::health::HealthCheckResult,
            crate::health::HealthSummary,
            crate::dashboard::DashboardData,
            crate::dashboard::ServiceTypeStats,
            crate::dashboard::PaymentMethodBreakdown,
            crate::dashboard::TopCustomer,
            crate::database::dao::RecentPayment,
            crate::database::entities::CustomerRecord,
            crate::database::entities::ServiceRecord,
            crate::database::entities::AccountStatus,
            crate::database::entities::ServiceType,
            crate::database::entities::BillingCycle,
            crate::database::entities::Currency,
            crate::database::entities::PaymentMethod,
            crate::database::entities::PaymentStatus,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Dashboard", description = "Payment aggregations"),
        (name = "Catalog", description = "Customer and service lookups"),
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI document at `/openapi.json`
pub fn create_docs_routes() -> Router<Server> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
