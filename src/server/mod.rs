pub mod config;
pub mod route_builder;

use crate::{
    config::Config,
    dashboard::DashboardService,
    database::{DatabaseManager, DatabaseManagerImpl},
    error::AppError,
    health::HealthService,
    metrics,
    routes::{
        create_catalog_routes, create_dashboard_routes, create_docs_routes, create_health_routes,
    },
    server::route_builder::request_response_logger,
    shutdown::{DatabaseShutdown, ShutdownCoordinator, ShutdownManager},
    utils::request_id_middleware,
};
use axum::{Router, middleware};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::{error, info};

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct Server {
    pub config: Arc<Config>,
    pub database: Arc<dyn DatabaseManager>,
    pub dashboard: DashboardService,
    pub health_service: Arc<HealthService>,
    pub shutdown_coordinator: Arc<ShutdownCoordinator>,
}

impl Server {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        if config.metrics.enabled {
            metrics::init_metrics_with_port(config.metrics.port).map_err(|e| {
                error!(
                    "Failed to start metrics server on port {}: {}",
                    config.metrics.port, e
                );
                AppError::Internal(format!("Failed to start metrics server: {}", e))
            })?;
        }

        let database_impl = Arc::new(
            DatabaseManagerImpl::new_from_config(&config.database)
                .await
                .map_err(AppError::Database)?,
        );
        let database: Arc<dyn DatabaseManager> = database_impl.clone();

        Ok(Self::with_database(config, database_impl, database).await)
    }

    /// Assemble the state around an existing database manager
    pub async fn with_database(
        config: Config,
        database_impl: Arc<DatabaseManagerImpl>,
        database: Arc<dyn DatabaseManager>,
    ) -> Self {
        let health_service = Arc::new(HealthService::new());
        health_service.register(database_impl).await;

        let dashboard = DashboardService::new(database.clone(), config.dashboard.clone());

        Self {
            config: Arc::new(config),
            database,
            dashboard,
            health_service,
            shutdown_coordinator: Arc::new(ShutdownCoordinator::new()),
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        if self.config.database.migration_on_startup {
            info!("Running database migrations");
            self.database.migrate().await.map_err(AppError::Database)?;
        }

        let mut shutdown_manager = ShutdownManager::new(Duration::from_secs(30));
        shutdown_manager.register(DatabaseShutdown::new(self.database.connection().clone()));

        let app = self.create_app();

        let addr: SocketAddr = format!("{}:{}", self.config.server.host, self.config.server.port)
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid server address: {}", e)))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind to address: {}", e)))?;

        info!("Server listening on http://{}", addr);

        let shutdown_coordinator = self.shutdown_coordinator.clone();
        tokio::spawn(async move {
            shutdown_coordinator.wait_for_shutdown_signal().await;
        });

        let mut shutdown_rx = self.shutdown_coordinator.subscribe();
        let result = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
            info!("Graceful shutdown initiated");
        })
        .await;

        if let Err(e) = result {
            error!("Server error: {}", e);
        }

        shutdown_manager.shutdown_all().await;
        info!("Server shutdown complete");

        Ok(())
    }

    /// The full router with middleware applied
    pub fn create_app(&self) -> Router {
        let app = Router::new()
            .nest("/health", create_health_routes())
            .nest(
                "/api",
                create_dashboard_routes()
                    .merge(create_catalog_routes())
                    .merge(create_docs_routes()),
            )
            .with_state(self.clone());

        self.add_conditional_middleware(app)
            .layer(middleware::from_fn(request_id_middleware))
    }

    fn add_conditional_middleware(&self, mut app: Router) -> Router {
        if self.config.metrics.enabled {
            app = app.layer(middleware::from_fn(metrics::metrics_middleware));
        }
        if self.config.logging.log_request {
            app = app.layer(middleware::from_fn(request_response_logger));
        }
        app
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::TestServerBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_route_is_mounted() {
        let server = TestServerBuilder::new().build().await;
        let app = server.create_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let server = TestServerBuilder::new().build().await;
        let app = server.create_app();

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
