//! Shelfwise configuration
//!
//! Settings live in a single TOML file, `config.toml`, in the platform config
//! directory. Each section implements `ConfigSection` so it can validate and
//! merge itself.
//!
//! - A missing file means defaults
//! - Invalid values in a loaded file are logged, not fatal
//! - Invalid values are never written back
//! - Writes are atomic, and the previous file is kept as `config.toml.backup`
//!
//! # Example
//!
//! ```rust,no_run
//! use shelfwise_config::{Config, ConfigManager};
//!
//! let manager = ConfigManager::new().expect("Failed to initialize config");
//! let config = manager.load_or_default();
//!
//! println!("Data file: {}", config.catalog.data_file.display());
//! ```

mod error;
mod manager;
mod persistence;
mod validation;

// Config sections
pub mod app_config;
pub mod catalog_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::{apply_env_overrides, ConfigManager, ENV_PREFIX};
pub use validation::{ConfigSection, Validator};

pub use app_config::{AppConfig, LogLevel};
pub use catalog_config::{CatalogConfig, EngineKind};

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version: u32,

    /// Application-level settings
    pub app: AppConfig,

    /// Data file and storage engine settings
    pub catalog: CatalogConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every section, returning all errors found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Validator::one_of(&self.version, &[CONFIG_VERSION], "version") {
            errors.push(e);
        }

        if let Err(mut e) = self.app.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.catalog.validate() {
            errors.append(&mut e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Folds every validation problem into a single error
    pub fn ensure_valid(&self) -> ConfigResult<()> {
        self.validate()
            .map_err(|errors| ConfigError::ValidationError(error::join_errors(&errors)))
    }

    /// Merges this config with another, preferring values from `other`
    ///
    /// Override chain: defaults < file < env vars < command-line flags
    pub fn merge(&mut self, other: Config) {
        self.app.merge(other.app);
        self.catalog.merge(other.catalog);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}
