//! Builders and fixtures shared by unit and integration tests

use crate::{
    config::Config,
    dashboard::DashboardConfig,
    database::{
        DatabaseConfig, DatabaseManager, DatabaseManagerImpl,
        entities::{
            CustomerRecord, PaymentMethod, PaymentRecord, PaymentStatus, PurchaseRecord,
            ServiceRecord, ServiceType,
        },
    },
    server::Server,
};
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::ConnectionTrait;

/// Test server builder backed by in-memory SQLite
pub struct TestServerBuilder {
    config: Config,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set a custom configuration; the database and metrics settings are
    /// still overridden for tests
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_dashboard_config(mut self, dashboard: DashboardConfig) -> Self {
        self.config.dashboard = dashboard;
        self
    }

    /// Build and migrate the server
    pub async fn build(self) -> Server {
        let mut config = self.config;
        config.database.url = "sqlite::memory:".to_string();
        config.metrics.enabled = false;

        let server = Server::new(config).await.unwrap();
        server.database.migrate().await.unwrap();
        server
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A fresh, migrated in-memory database
pub async fn migrated_database() -> DatabaseManagerImpl {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        ..Default::default()
    };
    let database = DatabaseManagerImpl::new_from_config(&config).await.unwrap();
    database.migrate().await.unwrap();
    database
}

/// Turn off SQLite foreign key enforcement to build rows that reference
/// missing customers, purchases or services
pub async fn allow_dangling_references(database: &DatabaseManagerImpl) {
    database
        .connection()
        .execute_unprepared("PRAGMA foreign_keys = OFF")
        .await
        .unwrap();
}

/// Short-hand inserts for building test scenarios
pub struct Fixture<'a> {
    database: &'a dyn DatabaseManager,
}

impl<'a> Fixture<'a> {
    pub fn new(database: &'a dyn DatabaseManager) -> Self {
        Self { database }
    }

    /// Customer with an email derived from the name
    pub async fn customer(&self, name: &str) -> i32 {
        let email = format!("{}@example.com", name.to_lowercase());
        self.database
            .customers()
            .create(&CustomerRecord::new(name, email))
            .await
            .unwrap()
    }

    pub async fn service(&self, name: &str, service_type: ServiceType, price: f64) -> i32 {
        self.database
            .services()
            .create(&ServiceRecord::new(name, service_type, price))
            .await
            .unwrap()
    }

    /// Purchase starting on a fixed date
    pub async fn purchase(&self, customer_id: i32, service_id: i32) -> i32 {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        self.database
            .purchases()
            .create(&PurchaseRecord::new(customer_id, service_id, start))
            .await
            .unwrap()
    }

    /// Credit card payment in the default currency
    pub async fn payment(
        &self,
        customer_id: i32,
        purchase_id: i32,
        amount: f64,
        status: PaymentStatus,
        timestamp: DateTime<Utc>,
    ) -> i32 {
        let record = PaymentRecord::new(
            customer_id,
            purchase_id,
            amount,
            PaymentMethod::CreditCard,
            timestamp,
        )
        .with_status(status);
        self.database.payments().create(&record).await.unwrap()
    }
}
