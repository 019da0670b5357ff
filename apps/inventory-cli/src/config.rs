//! # Application Configuration
//!
//! Loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`INVENTORY_*`, nested keys with `__`)
//! 2. Config file (`inventory.toml` in the working directory, or `--config`)
//! 3. Defaults (this file)
//!
//! ## Example `inventory.toml`
//! ```toml
//! database_path = "/srv/inventory/inventory.db"
//! categories = ["Electronics", "Furniture", "Consumable", "Other"]
//! import_enforces_categories = true
//! connect_retries = 5
//! retry_base_delay_ms = 250
//! log_filter = "info,inventory=debug,sqlx=warn"
//! ```
//!
//! `INVENTORY_CATEGORIES` takes a comma-separated list.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use inventory_core::{ALL_CATEGORIES, DEFAULT_CATEGORIES};
use inventory_db::DbConfig;

/// Base name of the optional config file (`inventory.toml`).
pub const DEFAULT_CONFIG_FILE: &str = "inventory";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "INVENTORY";

/// Default tracing filter when neither `RUST_LOG` nor `log_filter` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,inventory=debug,sqlx=warn";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Categories offered on the Add-Item form.
    pub categories: Vec<String>,

    /// Whether restored CSV rows must use a catalog category.
    pub import_enforces_categories: bool,

    /// Connections per session.
    pub max_connections: u32,

    /// Extra connection attempts at session start.
    pub connect_retries: u32,

    /// First backoff delay, doubled per retry.
    pub retry_base_delay_ms: u64,

    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: None,
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            import_enforces_categories: true,
            max_connections: 1,
            connect_retries: 3,
            retry_base_delay_ms: 200,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from `file` (required when given, otherwise the
    /// optional `inventory.toml`) overlaid with `INVENTORY_*` variables.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = Config::builder();
        let builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("categories"),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the commands cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::Message(
                "categories must contain at least one entry".to_string(),
            ));
        }
        if self.categories.iter().any(|c| c == ALL_CATEGORIES) {
            return Err(ConfigError::Message(format!(
                "'{}' is reserved for the category filter and cannot be a category",
                ALL_CATEGORIES
            )));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Message(
                "max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The database file to open.
    ///
    /// ## Platform Defaults
    /// - **Linux**: `~/.local/share/inventory-manager/inventory.db`
    /// - **macOS**: `~/Library/Application Support/com.inventory.manager/inventory.db`
    /// - **Windows**: `%APPDATA%\inventory\manager\data\inventory.db`
    ///
    /// Falls back to `./inventory.db` when no home directory is known.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.database_path {
            return path.clone();
        }
        match ProjectDirs::from("com", "inventory", "manager") {
            Some(dirs) => dirs.data_dir().join("inventory.db"),
            None => PathBuf::from("inventory.db"),
        }
    }

    /// Connection settings for a session.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path())
            .max_connections(self.max_connections)
            .min_connections(1)
            .connect_retries(self.connect_retries)
            .retry_base_delay(Duration::from_millis(self.retry_base_delay_ms))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
