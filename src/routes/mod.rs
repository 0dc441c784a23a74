pub mod catalog;
pub mod dashboard;
pub mod docs;
pub mod health;

pub use catalog::create_catalog_routes;
pub use dashboard::create_dashboard_routes;
pub use docs::create_docs_routes;
pub use health::create_health_routes;

use serde::Serialize;
use utoipa::ToSchema;

/// JSON body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Short error category, e.g. "Not found"
    pub error: String,
    /// Human readable detail
    pub message: String,
}
