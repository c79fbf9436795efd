//! Layered settings: built-in defaults, an optional TOML file, `ETL_*`
//! environment variables, then the classic `DB_*` variables.

use crate::error::Result;
use crate::models::MissingStrategy;
use crate::utils::constants::*;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use validator::Validate;

/// `DB_*` variables and the setting each one overrides
const LEGACY_DB_ENV: [(&str, &str); 7] = [
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_NAME", "database.name"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DATABASE_URL", "database.url"),
    ("DB_URL", "database.url"),
];

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DatabaseSettings {
    #[validate(length(min = 1))]
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,

    #[validate(length(min = 1))]
    pub name: String,

    pub user: String,

    pub password: String,

    /// Full connection URL; takes precedence over the individual fields.
    /// A `sqlite:` URL selects the SQLite backend.
    #[serde(default)]
    pub url: Option<String>,

    #[validate(range(min = 1))]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PipelineSettings {
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub log_file: PathBuf,
    pub missing_strategy: MissingStrategy,

    /// Rows per upsert statement, at most `MAX_BATCH_SIZE`
    #[validate(range(min = 1, max = 2000))]
    pub batch_size: usize,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub database: DatabaseSettings,

    #[validate(nested)]
    pub pipeline: PipelineSettings,
}

impl Settings {
    /// Load settings from every source; `config_file` must exist when given
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let builder = Self::default_builder()?;

        let builder = match config_file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let mut builder = builder.add_source(
            Environment::with_prefix("ETL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        for (var, key) in LEGACY_DB_ENV {
            builder = builder.set_override_option(key, std::env::var(var).ok())?;
        }

        Self::from_builder(builder)
    }

    /// Defaults suitable for local development
    pub fn default_builder() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("database.host", DEFAULT_DB_HOST)?
            .set_default("database.port", i64::from(DEFAULT_DB_PORT))?
            .set_default("database.name", DEFAULT_DB_NAME)?
            .set_default("database.user", DEFAULT_DB_USER)?
            .set_default("database.password", DEFAULT_DB_PASSWORD)?
            .set_default("database.max_connections", i64::from(DEFAULT_MAX_CONNECTIONS))?
            .set_default("pipeline.raw_dir", DEFAULT_RAW_DATA_DIR)?
            .set_default("pipeline.processed_dir", DEFAULT_PROCESSED_DATA_DIR)?
            .set_default("pipeline.log_file", DEFAULT_LOG_FILE)?
            .set_default("pipeline.missing_strategy", MissingStrategy::default().as_str())?
            .set_default("pipeline.batch_size", DEFAULT_BATCH_SIZE as i64)?)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}
