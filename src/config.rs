use crate::dashboard::DashboardConfig;
use crate::database::DatabaseConfig;
use crate::server::config::{LoggingConfig, MetricsConfig, ServerConfig};
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

fn environment() -> Environment {
    Environment::with_prefix("PAYMENTS")
        .prefix_separator("_")
        .separator("__")
}

impl Config {
    /// Defaults, then `config.yaml` in the working directory if present,
    /// then `PAYMENTS_*` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder =
            ConfigBuilder::builder().add_source(config::Config::try_from(&Config::default())?);

        if Path::new("config.yaml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder.add_source(environment()).build()?.try_deserialize()
    }

    /// Same layering as [`Config::load`] with an explicit file in place of `config.yaml`
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut builder =
            ConfigBuilder::builder().add_source(config::Config::try_from(&Config::default())?);

        if path.as_ref().exists() {
            builder = builder.add_source(File::from(path.as_ref()));
        }

        builder.add_source(environment()).build()?.try_deserialize()
    }
}
