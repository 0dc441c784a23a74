//! Read-only dashboard aggregations
//!
//! [`DashboardService`] turns the raw sums produced by the payments DAO into
//! the three dashboard result sets: recent payments, per-service-type
//! statistics and top customers. It never writes.

pub mod config;
pub mod stats;

pub use config::DashboardConfig;
pub use stats::{PaymentMethodBreakdown, ServiceTypeStats, TopCustomer, ratio};

use crate::database::dao::RecentPayment;
use crate::database::{DatabaseManager, DatabaseResult};
use crate::metrics::track_dashboard_query;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use utoipa::{IntoParams, ToSchema};

/// Optional result-set sizes for a dashboard request
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// Number of recent payments to return
    pub recent_limit: Option<u64>,
    /// Number of top customers to return
    pub top_limit: Option<u64>,
}

/// All three dashboard result sets, computed for one request
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardData {
    pub recent_payments: Vec<RecentPayment>,
    pub service_stats: Vec<ServiceTypeStats>,
    pub top_customers: Vec<TopCustomer>,
}

#[derive(Clone)]
pub struct DashboardService {
    database: Arc<dyn DatabaseManager>,
    config: DashboardConfig,
}

impl DashboardService {
    pub fn new(database: Arc<dyn DatabaseManager>, config: DashboardConfig) -> Self {
        Self { database, config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    fn clamp(&self, requested: Option<u64>, default: u64) -> u64 {
        requested.unwrap_or(default).min(self.config.max_limit)
    }

    async fn timed<T, F>(query: &'static str, future: F) -> DatabaseResult<T>
    where
        F: Future<Output = DatabaseResult<T>>,
    {
        let start = Instant::now();
        let result = future.await;
        let duration = start.elapsed();
        track_dashboard_query(query, result.is_ok(), duration);

        match &result {
            Ok(_) => debug!(query, elapsed_ms = duration.as_millis() as u64, "Dashboard query"),
            Err(e) => warn!(query, error = %e, "Dashboard query failed"),
        }
        result
    }

    /// Most recent payments, newest first
    pub async fn recent_payments(&self, limit: Option<u64>) -> DatabaseResult<Vec<RecentPayment>> {
        let limit = self.clamp(limit, self.config.recent_payments_limit);
        Self::timed(
            "recent_payments",
            self.database.payments().recent_payments(limit),
        )
        .await
    }

    /// Statistics per service type, ordered by service type
    pub async fn service_stats(&self) -> DatabaseResult<Vec<ServiceTypeStats>> {
        let totals =
            Self::timed("service_stats", self.database.payments().service_type_totals()).await?;
        Ok(totals.into_iter().map(ServiceTypeStats::from).collect())
    }

    /// Customers ranked by total spend
    pub async fn top_customers(&self, limit: Option<u64>) -> DatabaseResult<Vec<TopCustomer>> {
        let limit = self.clamp(limit, self.config.top_customers_limit);
        let totals = Self::timed(
            "top_customers",
            self.database.payments().top_customer_totals(limit),
        )
        .await?;
        Ok(totals.into_iter().map(TopCustomer::from).collect())
    }

    /// Run the three queries concurrently; the first failure fails the request
    pub async fn dashboard(&self, query: DashboardQuery) -> DatabaseResult<DashboardData> {
        let (recent_payments, service_stats, top_customers) = tokio::try_join!(
            self.recent_payments(query.recent_limit),
            self.service_stats(),
            self.top_customers(query.top_limit),
        )?;

        Ok(DashboardData {
            recent_payments,
            service_stats,
            top_customers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entities::{PaymentStatus, ServiceType};
    use crate::test_utils::{Fixture, migrated_database};
    use chrono::{Duration, TimeZone, Utc};

    async fn service_with_data() -> DashboardService {
        let database = migrated_database().await;
        {
            let fixture = Fixture::new(&database);
            let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
            let internet = fixture.service("Fiber 1Gbps", ServiceType::Internet, 30.0).await;
            let mobile = fixture.service("Mobile Plan 5GB", ServiceType::Mobile, 10.0).await;

            for i in 0..8 {
                let customer = fixture.customer(&format!("customer_{i}")).await;
                let service = if i % 2 == 0 { internet } else { mobile };
                let purchase = fixture.purchase(customer, service).await;
                for j in 0..=i {
                    let status = if j % 3 == 0 {
                        PaymentStatus::Failed
                    } else {
                        PaymentStatus::Completed
                    };
                    fixture
                        .payment(
                            customer,
                            purchase,
                            10.0 + j as f64,
                            status,
                            start + Duration::hours((i * 10 + j) as i64),
                        )
                        .await;
                }
            }
        }
        DashboardService::new(Arc::new(database), DashboardConfig::default())
    }

    #[tokio::test]
    async fn test_default_and_clamped_limits() {
        let service = service_with_data().await;

        assert_eq!(service.recent_payments(None).await.unwrap().len(), 5);
        assert_eq!(service.top_customers(None).await.unwrap().len(), 5);
        assert_eq!(service.recent_payments(Some(2)).await.unwrap().len(), 2);
        assert!(service.top_customers(Some(0)).await.unwrap().is_empty());

        let clamped = DashboardService::new(
            service.database.clone(),
            DashboardConfig {
                max_limit: 3,
                ..Default::default()
            },
        );
        assert_eq!(clamped.recent_payments(Some(50)).await.unwrap().len(), 3);
        assert_eq!(clamped.top_customers(Some(50)).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_service_stats_counts_add_up() {
        let service = service_with_data().await;
        let stats = service.service_stats().await.unwrap();

        let types: Vec<_> = stats.iter().map(|s| s.service_type).collect();
        assert_eq!(types, vec![ServiceType::Internet, ServiceType::Mobile]);

        let total: i64 = stats.iter().map(|s| s.total_payments).sum();
        assert_eq!(total, (1..=8).sum::<i64>());

        for group in &stats {
            assert!((0.0..=1.0).contains(&group.success_rate));
            let methods = &group.payment_methods;
            assert_eq!(
                methods.credit_card + methods.bank_transfer + methods.mobile_payment + methods.cash_payment,
                group.total_payments
            );
        }
    }

    #[tokio::test]
    async fn test_dashboard_combines_result_sets() {
        let service = service_with_data().await;
        let data = service
            .dashboard(DashboardQuery {
                recent_limit: Some(3),
                top_limit: Some(2),
            })
            .await
            .unwrap();

        assert_eq!(data.recent_payments.len(), 3);
        assert_eq!(data.service_stats.len(), 2);
        assert_eq!(data.top_customers.len(), 2);
        // customer_7 made the most and largest payments
        assert_eq!(data.top_customers[0].customer_name, "customer_7");
        assert!(data.top_customers[0].total_spent >= data.top_customers[1].total_spent);
    }

    #[tokio::test]
    async fn test_empty_dashboard() {
        let database = migrated_database().await;
        let service = DashboardService::new(Arc::new(database), DashboardConfig::default());

        let data = service.dashboard(DashboardQuery::default()).await.unwrap();
        assert!(data.recent_payments.is_empty());
        assert!(data.service_stats.is_empty());
        assert!(data.top_customers.is_empty());
    }
}
