//! Database access layer with domain-specific DAOs
//!
//! Each table (customers, services, purchases, payments) has its own DAO.
//! The payments DAO also carries the read-only aggregation queries that feed
//! the dashboard.

use crate::health::HealthChecker;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, DatabaseConnection};
use thiserror::Error;
use tracing::info;

pub mod config;
pub mod dao;
pub mod entities;
pub mod migration;

pub use config::DatabaseConfig;
pub use dao::{CustomersDao, PaymentsDao, PurchasesDao, ServicesDao};

/// Database error types
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Record not found")]
    NotFound,
    #[error("Constraint violation: {0}")]
    Constraint(String),
    #[error("Migration error: {0}")]
    Migration(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Database manager trait for dependency injection and testing
#[async_trait]
pub trait DatabaseManager: Send + Sync {
    /// Run database migrations
    async fn migrate(&self) -> DatabaseResult<()>;

    /// Health check for database connection
    async fn health_check(&self) -> DatabaseResult<()>;

    /// Get customers DAO
    fn customers(&self) -> CustomersDao;

    /// Get services DAO
    fn services(&self) -> ServicesDao;

    /// Get purchases DAO
    fn purchases(&self) -> PurchasesDao;

    /// Get payments DAO
    fn payments(&self) -> PaymentsDao;

    /// Get direct database connection (for migrations and admin operations)
    fn connection(&self) -> &DatabaseConnection;
}

/// Database connection manager implementation
pub struct DatabaseManagerImpl {
    pub connection: DatabaseConnection,
}

impl DatabaseManagerImpl {
    /// Connect using the given configuration
    pub async fn new_from_config(config: &DatabaseConfig) -> DatabaseResult<Self> {
        let max_connections = if config.is_in_memory() {
            1
        } else {
            config.max_connections
        };

        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(max_connections)
            .sqlx_logging(false);

        let connection = sea_orm::Database::connect(options)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        info!(max_connections, "Connected to database");

        Ok(Self { connection })
    }
}

#[async_trait]
impl DatabaseManager for DatabaseManagerImpl {
    async fn migrate(&self) -> DatabaseResult<()> {
        use crate::database::migration::Migrator;
        use sea_orm_migration::MigratorTrait;

        info!("Running database migrations");

        Migrator::up(&self.connection, None)
            .await
            .map_err(|e| DatabaseError::Migration(format!("Failed to run migrations: {}", e)))?;

        info!("Successfully completed all migrations");
        Ok(())
    }

    async fn health_check(&self) -> DatabaseResult<()> {
        self.connection
            .ping()
            .await
            .map_err(|e| DatabaseError::Database(format!("db error: {}", e)))
    }

    fn customers(&self) -> CustomersDao {
        CustomersDao::new(self.connection.clone())
    }

    fn services(&self) -> ServicesDao {
        ServicesDao::new(self.connection.clone())
    }

    fn purchases(&self) -> PurchasesDao {
        PurchasesDao::new(self.connection.clone())
    }

    fn payments(&self) -> PaymentsDao {
        PaymentsDao::new(self.connection.clone())
    }

    fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}

#[async_trait]
impl HealthChecker for DatabaseManagerImpl {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> crate::health::HealthCheckResult {
        match self.health_check().await {
            Ok(_) => crate::health::HealthCheckResult::healthy_with_details(serde_json::json!({
                "status": "healthy",
                "connection": "ok"
            })),
            Err(err) => crate::health::HealthCheckResult::unhealthy_with_details(
                "DB health check failed".to_string(),
                serde_json::json!({
                    "status": "unhealthy",
                    "error": err.to_string()
                }),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::HealthStatus;

    async fn memory_database() -> DatabaseManagerImpl {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        };
        DatabaseManagerImpl::new_from_config(&config).await.unwrap()
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let database = memory_database().await;
        database.migrate().await.unwrap();
        database.migrate().await.unwrap();

        assert_eq!(database.customers().count().await.unwrap(), 0);
        assert_eq!(database.payments().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_health_checker_reports_healthy() {
        let database = memory_database().await;
        let result = database.check().await;
        assert!(matches!(result.status, HealthStatus::Healthy));
        assert_eq!(database.name(), "database");
    }

    #[tokio::test]
    async fn test_connect_to_unreachable_database_fails() {
        let config = DatabaseConfig {
            url: "sqlite:///nonexistent-dir/payments.db?mode=ro".to_string(),
            ..Default::default()
        };
        let result = DatabaseManagerImpl::new_from_config(&config).await;
        assert!(matches!(result, Err(DatabaseError::Database(_))));
    }
}
