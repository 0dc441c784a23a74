use serde::{Deserialize, Serialize};

/// Result-set sizes for the dashboard queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Recent payments returned when the request names no limit
    #[serde(default = "default_recent_payments_limit")]
    pub recent_payments_limit: u64,
    /// Top customers returned when the request names no limit
    #[serde(default = "default_top_customers_limit")]
    pub top_customers_limit: u64,
    /// Upper bound applied to any requested limit
    #[serde(default = "default_max_limit")]
    pub max_limit: u64,
}

fn default_recent_payments_limit() -> u64 {
    5
}

fn default_top_customers_limit() -> u64 {
    5
}

fn default_max_limit() -> u64 {
    100
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_payments_limit: default_recent_payments_limit(),
            top_customers_limit: default_top_customers_limit(),
            max_limit: default_max_limit(),
        }
    }
}
