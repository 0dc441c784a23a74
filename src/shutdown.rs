use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::{signal, sync::watch, time::timeout};
use tracing::{error, info, warn};

/// Broadcasts a one-shot shutdown signal to the server and its components
#[derive(Clone)]
pub struct ShutdownCoordinator {
    shutdown_requested: Arc<AtomicBool>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            shutdown_requested: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::Relaxed)
    }

    /// Idempotent; only the first call broadcasts
    pub fn initiate_shutdown(&self) {
        if self
            .shutdown_requested
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
            .is_ok()
        {
            info!("Initiating graceful shutdown...");
            if let Err(e) = self.shutdown_tx.send(true) {
                error!("Failed to broadcast shutdown signal: {}", e);
            }
        }
    }

    /// Wait for SIGINT or SIGTERM, then initiate shutdown
    pub async fn wait_for_shutdown_signal(&self) {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    error!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C signal"),
            _ = terminate => info!("Received terminate signal"),
        }

        self.initiate_shutdown();
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Component that releases resources once the server stops accepting requests
#[async_trait]
pub trait GracefulShutdown: Send + Sync {
    fn name(&self) -> &str;

    async fn shutdown(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Runs registered components' shutdown hooks in order, each under a timeout
pub struct ShutdownManager {
    components: Vec<Box<dyn GracefulShutdown>>,
    timeout_duration: Duration,
}

impl ShutdownManager {
    pub fn new(timeout_duration: Duration) -> Self {
        Self {
            components: Vec::new(),
            timeout_duration,
        }
    }

    pub fn register<T>(&mut self, component: T)
    where
        T: GracefulShutdown + 'static,
    {
        self.components.push(Box::new(component));
    }

    pub async fn shutdown_all(&self) {
        for component in &self.components {
            let name = component.name();
            info!(component = name, "Shutting down component");
            match timeout(self.timeout_duration, component.shutdown()).await {
                Ok(Ok(())) => info!(component = name, "Component shut down"),
                Ok(Err(e)) => error!(component = name, error = %e, "Component shutdown failed"),
                Err(_) => warn!(
                    component = name,
                    timeout_secs = self.timeout_duration.as_secs(),
                    "Component shutdown timed out"
                ),
            }
        }
    }
}

/// Closes the connection pool
pub struct DatabaseShutdown {
    connection: DatabaseConnection,
}

impl DatabaseShutdown {
    pub fn new(connection: DatabaseConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl GracefulShutdown for DatabaseShutdown {
    fn name(&self) -> &str {
        "database"
    }

    async fn shutdown(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.connection.clone().close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct CountingComponent {
        calls: Arc<AtomicUsize>,
        delay: Duration,
    }

    #[async_trait]
    impl GracefulShutdown for CountingComponent {
        fn name(&self) -> &str {
            "counting"
        }

        async fn shutdown(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            tokio::time::sleep(self.delay).await;
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_initiate_shutdown_notifies_subscribers_once() {
        let coordinator = ShutdownCoordinator::new();
        let mut rx = coordinator.subscribe();
        assert!(!coordinator.is_shutdown_requested());

        coordinator.initiate_shutdown();
        coordinator.initiate_shutdown();

        rx.changed().await.unwrap();
        assert!(*rx.borrow());
        assert!(coordinator.is_shutdown_requested());
    }

    #[tokio::test]
    async fn test_shutdown_all_runs_components_and_respects_timeout() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut manager = ShutdownManager::new(Duration::from_millis(50));
        manager.register(CountingComponent {
            calls: calls.clone(),
            delay: Duration::ZERO,
        });
        manager.register(CountingComponent {
            calls: calls.clone(),
            delay: Duration::from_secs(5),
        });

        manager.shutdown_all().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
