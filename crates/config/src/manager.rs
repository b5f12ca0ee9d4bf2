//! Configuration manager - main API for config operations

use crate::persistence::ConfigPersistence;
use crate::{Config, ConfigError, ConfigResult, EngineKind, LogLevel};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Prefix of the environment variables that override config values
pub const ENV_PREFIX: &str = "SHELFWISE";

const CONFIG_FILE_NAME: &str = "config.toml";

pub struct ConfigManager {
    persistence: ConfigPersistence,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a manager for the platform config directory
    ///
    /// - Linux: `~/.config/shelfwise/`
    /// - macOS: `~/Library/Application Support/shelfwise/`
    /// - Windows: `%APPDATA%\shelfwise\`
    pub fn new() -> ConfigResult<Self> {
        let config_dir = Self::default_config_dir()?;
        Ok(Self::with_directory(config_dir))
    }

    /// Creates a manager for a custom config directory
    pub fn with_directory(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        let persistence = ConfigPersistence::new(config_dir.join(CONFIG_FILE_NAME));

        Self {
            persistence,
            config_dir,
        }
    }

    fn default_config_dir() -> ConfigResult<PathBuf> {
        ProjectDirs::from("", "", "shelfwise")
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: "Could not determine user config directory".to_string(),
            })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> &Path {
        self.persistence.path()
    }

    /// Loads the config file; a missing file yields defaults
    pub fn load(&self) -> ConfigResult<Config> {
        self.persistence.load()
    }

    /// Loads the config file, logging and falling back to defaults on error
    pub fn load_or_default(&self) -> Config {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {}, using defaults", e);
                Config::default()
            }
        }
    }

    /// Validates and saves atomically
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.persistence.save(config)
    }

    /// Loads, applies `update_fn`, and saves
    ///
    /// ```rust,no_run
    /// # use shelfwise_config::{ConfigManager, EngineKind};
    /// # let manager = ConfigManager::new().unwrap();
    /// manager.update(|config| {
    ///     config.catalog.engine = EngineKind::List;
    /// }).expect("Failed to update config");
    /// ```
    pub fn update<F>(&self, update_fn: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.load()?;
        update_fn(&mut config);
        self.save(&config)
    }

    /// Writes a default config file unless one exists
    ///
    /// Returns `Ok(true)` if a file was created.
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.config_path().exists() {
            log::info!(
                "Config file already exists at {}",
                self.config_path().display()
            );
            return Ok(false);
        }

        self.save(&Config::default())?;
        log::info!("Generated default config at {}", self.config_path().display());
        Ok(true)
    }

    /// Overwrites the config file with defaults
    pub fn reset(&self) -> ConfigResult<()> {
        self.save(&Config::default())
    }

    /// Returns the validation problems of the config file, if any
    pub fn validate(&self) -> ConfigResult<Vec<String>> {
        let config = self.load()?;

        match config.validate() {
            Ok(()) => Ok(Vec::new()),
            Err(errors) => Ok(errors.iter().map(|e| e.to_string()).collect()),
        }
    }

    /// Loads the config file and applies environment overrides
    ///
    /// Variables follow the pattern `SHELFWISE_SECTION_FIELD`, for example
    /// `SHELFWISE_CATALOG_ENGINE=list`.
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

        if let Err(errors) = config.validate() {
            log::warn!(
                "Config validation warnings after env overrides: {}",
                crate::error::join_errors(&errors)
            );
        }

        Ok(config)
    }
}

/// Applies `SHELFWISE_*` overrides found through `lookup`
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| {
        let key = format!("{}_{}", ENV_PREFIX, name);
        lookup(&key).map(|value| (key, value))
    };

    if let Some((_, value)) = var("CATALOG_DATA_FILE") {
        config.catalog.data_file = PathBuf::from(value);
    }

    if let Some((key, value)) = var("CATALOG_ENGINE") {
        config.catalog.engine = value
            .parse::<EngineKind>()
            .map_err(|reason| invalid_override(key, value, reason))?;
    }

    if let Some((key, value)) = var("APP_LOG_LEVEL") {
        config.app.log_level = value
            .parse::<LogLevel>()
            .map_err(|reason| invalid_override(key, value, reason))?;
    }

    Ok(())
}

fn invalid_override(variable: String, value: String, reason: String) -> ConfigError {
    ConfigError::InvalidOverride {
        variable,
        value,
        reason,
    }
}
