pub mod migrate;
pub mod seed;

use crate::Config;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (the default)
    Serve,
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: migrate::MigrateAction,
    },
    /// Populate the database with synthetic data
    Seed(seed::SeedArgs),
    /// Delete all customers, services, purchases and payments
    Clear(seed::ClearArgs),
}

/// Run a non-server command
pub async fn handle_command(
    command: Commands,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve => Err("serve is handled by the binary entry point".into()),
        Commands::Migrate { action } => migrate::handle_migrate_command(action, config).await,
        Commands::Seed(args) => seed::handle_seed_command(args, config).await,
        Commands::Clear(args) => seed::handle_clear_command(args, config).await,
    }
}
