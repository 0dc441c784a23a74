use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    pub message: Option<String>,
    pub details: Option<serde_json::Value>,
    pub duration_ms: Option<u64>,
}

impl HealthCheckResult {
    pub fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
            message: None,
            details: None,
            duration_ms: None,
        }
    }

    pub fn healthy_with_details(details: serde_json::Value) -> Self {
        Self {
            details: Some(details),
            ..Self::healthy()
        }
    }

    pub fn unhealthy(message: String) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            message: Some(message),
            details: None,
            duration_ms: None,
        }
    }

    pub fn unhealthy_with_details(message: String, details: serde_json::Value) -> Self {
        Self {
            details: Some(details),
            ..Self::unhealthy(message)
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

#[async_trait]
pub trait HealthChecker: Send + Sync {
    /// The name of this health check component
    fn name(&self) -> &str;

    /// Perform the health check
    async fn check(&self) -> HealthCheckResult;
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OverallHealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub checks: BTreeMap<String, HealthCheckResult>,
    pub summary: HealthSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthSummary {
    pub total_checks: usize,
    pub healthy_count: usize,
    pub degraded_count: usize,
    pub unhealthy_count: usize,
    pub total_duration_ms: u64,
}

/// Registry of component health checkers
pub struct HealthService {
    checkers: Arc<RwLock<BTreeMap<String, Arc<dyn HealthChecker>>>>,
}

impl HealthService {
    pub fn new() -> Self {
        Self {
            checkers: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Register a health checker for a specific component
    pub async fn register(&self, checker: Arc<dyn HealthChecker>) {
        let name = checker.name().to_string();
        self.checkers.write().await.insert(name, checker);
    }

    /// Run all checks (`all`), a single named check, or none at all.
    /// An unknown name runs nothing and reports healthy.
    pub async fn check_health(&self, filter: Option<&str>) -> OverallHealthResponse {
        let checkers = self.checkers.read().await;
        let mut results = BTreeMap::new();
        let mut total_duration = 0u64;

        let checks_to_run: Vec<_> = match filter {
            Some("all") => checkers.iter().collect(),
            Some(specific) => checkers
                .iter()
                .filter(|(name, _)| name.as_str() == specific)
                .collect(),
            None => vec![],
        };

        for (name, checker) in checks_to_run {
            let start = Instant::now();
            let result = checker.check().await;
            let duration = start.elapsed().as_millis() as u64;
            total_duration += duration;
            results.insert(name.clone(), result.with_duration(duration));
        }

        let count = |status: HealthStatus| results.values().filter(|r| r.status == status).count();
        let healthy_count = count(HealthStatus::Healthy);
        let degraded_count = count(HealthStatus::Degraded);
        let unhealthy_count = count(HealthStatus::Unhealthy);

        // Worst component wins
        let status = if unhealthy_count > 0 {
            HealthStatus::Unhealthy
        } else if degraded_count > 0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        OverallHealthResponse {
            status,
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: HealthSummary {
                total_checks: results.len(),
                healthy_count,
                degraded_count,
                unhealthy_count,
                total_duration_ms: total_duration,
            },
            checks: results,
        }
    }

    pub async fn get_registered_checkers(&self) -> Vec<String> {
        self.checkers.read().await.keys().cloned().collect()
    }
}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticChecker {
        name: &'static str,
        status: HealthStatus,
    }

    #[async_trait]
    impl HealthChecker for StaticChecker {
        fn name(&self) -> &str {
            self.name
        }

        async fn check(&self) -> HealthCheckResult {
            match self.status {
                HealthStatus::Healthy => HealthCheckResult::healthy(),
                HealthStatus::Degraded => HealthCheckResult {
                    status: HealthStatus::Degraded,
                    message: Some("slow".to_string()),
                    ..HealthCheckResult::healthy()
                },
                HealthStatus::Unhealthy => HealthCheckResult::unhealthy("down".to_string()),
            }
        }
    }

    fn checker(name: &'static str, status: HealthStatus) -> Arc<dyn HealthChecker> {
        Arc::new(StaticChecker { name, status })
    }

    #[tokio::test]
    async fn test_register_and_check_all() {
        let service = HealthService::new();
        service.register(checker("database", HealthStatus::Healthy)).await;

        assert_eq!(service.get_registered_checkers().await, vec!["database"]);

        let response = service.check_health(Some("all")).await;
        assert_eq!(response.status, HealthStatus::Healthy);
        assert_eq!(response.service, "payments-dashboard");
        assert_eq!(response.summary.total_checks, 1);
        assert_eq!(response.summary.healthy_count, 1);
        assert!(response.checks["database"].duration_ms.is_some());
    }

    #[tokio::test]
    async fn test_worst_status_wins() {
        let service = HealthService::new();
        service.register(checker("a", HealthStatus::Healthy)).await;
        service.register(checker("b", HealthStatus::Degraded)).await;

        let response = service.check_health(Some("all")).await;
        assert_eq!(response.status, HealthStatus::Degraded);

        service.register(checker("c", HealthStatus::Unhealthy)).await;
        let response = service.check_health(Some("all")).await;
        assert_eq!(response.status, HealthStatus::Unhealthy);
        assert_eq!(response.summary.degraded_count, 1);
        assert_eq!(response.summary.unhealthy_count, 1);
    }

    #[tokio::test]
    async fn test_specific_and_missing_filters() {
        let service = HealthService::new();
        service.register(checker("database", HealthStatus::Healthy)).await;
        service.register(checker("other", HealthStatus::Unhealthy)).await;

        let response = service.check_health(Some("database")).await;
        assert_eq!(response.status, HealthStatus::Healthy);
        assert!(response.checks.contains_key("database"));
        assert!(!response.checks.contains_key("other"));

        let response = service.check_health(None).await;
        assert_eq!(response.summary.total_checks, 0);

        let response = service.check_health(Some("unknown")).await;
        assert_eq!(response.status, HealthStatus::Healthy);
        assert!(response.checks.is_empty());
    }
}
