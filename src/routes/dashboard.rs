use crate::{
    dashboard::{DashboardData, DashboardQuery, ServiceTypeStats, TopCustomer},
    database::dao::RecentPayment,
    error::AppError,
    routes::ApiErrorResponse,
    server::Server,
};
use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::Deserialize;
use utoipa::IntoParams;

pub fn create_dashboard_routes() -> Router<Server> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/recent-payments", get(get_recent_payments))
        .route("/dashboard/service-stats", get(get_service_stats))
        .route("/dashboard/top-customers", get(get_top_customers))
}

/// Query parameters for a single result set
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitQuery {
    /// Number of rows to return; capped by `dashboard.max_limit`
    pub limit: Option<u64>,
}

/// All dashboard result sets
#[utoipa::path(
    get,
    path = "/api/dashboard",
    summary = "Dashboard",
    description = "Recent payments, per-service-type statistics and top customers in one response",
    tags = ["Dashboard"],
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard data", body = DashboardData),
        (status = 400, description = "Invalid query parameters", body = ApiErrorResponse),
        (status = 500, description = "Database error", body = ApiErrorResponse)
    )
)]
pub async fn get_dashboard(
    State(server): State<Server>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardData>, AppError> {
    Ok(Json(server.dashboard.dashboard(query).await?))
}

/// Most recent payments
#[utoipa::path(
    get,
    path = "/api/dashboard/recent-payments",
    summary = "Recent Payments",
    description = "Newest payments first, with customer and service names",
    tags = ["Dashboard"],
    params(LimitQuery),
    responses(
        (status = 200, description = "Recent payments", body = Vec<RecentPayment>),
        (status = 500, description = "Database error", body = ApiErrorResponse)
    )
)]
pub async fn get_recent_payments(
    State(server): State<Server>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<RecentPayment>>, AppError> {
    Ok(Json(server.dashboard.recent_payments(query.limit).await?))
}

/// Statistics per service type
#[utoipa::path(
    get,
    path = "/api/dashboard/service-stats",
    summary = "Service Statistics",
    description = "Payment totals, averages, success rates and payment methods per service type",
    tags = ["Dashboard"],
    responses(
        (status = 200, description = "Service type statistics", body = Vec<ServiceTypeStats>),
        (status = 500, description = "Database error", body = ApiErrorResponse)
    )
)]
pub async fn get_service_stats(
    State(server): State<Server>,
) -> Result<Json<Vec<ServiceTypeStats>>, AppError> {
    Ok(Json(server.dashboard.service_stats().await?))
}

/// Customers ranked by total spend
#[utoipa::path(
    get,
    path = "/api/dashboard/top-customers",
    summary = "Top Customers",
    description = "Customers ordered by total amount paid, highest first",
    tags = ["Dashboard"],
    params(LimitQuery),
    responses(
        (status = 200, description = "Top customers", body = Vec<TopCustomer>),
        (status = 500, description = "Database error", body = ApiErrorResponse)
    )
)]
pub async fn get_top_customers(
    State(server): State<Server>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<TopCustomer>>, AppError> {
    Ok(Json(server.dashboard.top_customers(query.limit).await?))
}
