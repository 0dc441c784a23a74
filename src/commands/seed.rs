use crate::Config;
use crate::database::{DatabaseManager, DatabaseManagerImpl};
use crate::seeding::{self, DataGenerator, SeedOptions, SeedReport};
use chrono::Utc;
use clap::Args;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    /// Number of customers to create
    #[arg(long, default_value = "1000")]
    pub customers: usize,
    /// Number of purchases to create
    #[arg(long, default_value = "1000")]
    pub purchases: usize,
    /// Number of payments to create
    #[arg(long, default_value = "1000")]
    pub payments: usize,
    /// Seed for random number generator (for reproducible data)
    #[arg(short, long, default_value = "42")]
    pub seed: u64,
    /// Keep existing rows instead of clearing the tables first
    #[arg(long)]
    pub keep_existing: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ClearArgs {
    /// Skip the safety check
    #[arg(short, long)]
    pub force: bool,
}

async fn connect(config: &Config) -> Result<Arc<DatabaseManagerImpl>, Box<dyn std::error::Error>> {
    let database = DatabaseManagerImpl::new_from_config(&config.database).await?;
    database.migrate().await?;
    Ok(Arc::new(database))
}

/// Seed the configured database and return what was created
pub async fn run_seed(
    args: &SeedArgs,
    config: &Config,
) -> Result<SeedReport, Box<dyn std::error::Error>> {
    let database = connect(config).await?;
    let options = SeedOptions {
        customers: args.customers,
        purchases: args.purchases,
        payments: args.payments,
        seed: args.seed,
        clear_first: !args.keep_existing,
        now: Utc::now(),
    };

    info!(
        customers = options.customers,
        purchases = options.purchases,
        payments = options.payments,
        seed = options.seed,
        "Seeding database"
    );
    Ok(DataGenerator::run(database, &options).await?)
}

pub async fn handle_seed_command(
    args: SeedArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = run_seed(&args, config).await?;

    println!("Customers: {}", report.customers);
    println!("Services:  {}", report.services);
    println!("Purchases: {}", report.purchases);
    println!("Payments:  {}", report.payments);
    println!("Total amount: {:.2}", report.total_amount);
    println!("Elapsed: {} ms", report.elapsed_ms);
    Ok(())
}

pub async fn handle_clear_command(
    args: ClearArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let database = connect(config).await?;

    if !args.force {
        let payments = database.payments().count().await?;
        let customers = database.customers().count().await?;
        println!(
            "This would delete {} payments and {} customers (plus all services and purchases).",
            payments, customers
        );
        return Err("refusing to clear without --force".into());
    }

    let report = seeding::clear(database.as_ref()).await?;
    println!(
        "Deleted {} payments, {} purchases, {} services, {} customers",
        report.payments, report.purchases, report.services, report.customers
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> Config {
        let mut config = Config::default();
        config.database.url = "sqlite::memory:".to_string();
        config
    }

    #[tokio::test]
    async fn test_run_seed_on_fresh_database() {
        let args = SeedArgs {
            customers: 12,
            purchases: 20,
            payments: 40,
            seed: 1,
            keep_existing: false,
        };

        let report = run_seed(&args, &memory_config()).await.unwrap();
        assert_eq!(report.customers, 12);
        assert_eq!(report.services, 20);
        assert_eq!(report.purchases, 20);
        assert_eq!(report.payments, 40);
        assert!(report.total_amount > 0.0);
    }

    #[tokio::test]
    async fn test_clear_requires_force() {
        let result = handle_clear_command(ClearArgs { force: false }, &memory_config()).await;
        assert!(result.is_err());

        let result = handle_clear_command(ClearArgs { force: true }, &memory_config()).await;
        assert!(result.is_ok());
    }
}
