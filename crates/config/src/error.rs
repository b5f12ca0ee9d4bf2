//! Error types for the configuration system

use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot replace {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file exists but holds nothing but whitespace
    #[error("Config file at {path} is empty")]
    EmptyFile { path: PathBuf },

    #[error("Invalid TOML in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Cannot encode config as TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Config contains invalid values
    #[error("Invalid config: {0}")]
    ValidationError(String),

    /// An environment override could not be parsed
    #[error("Invalid value '{value}' in {variable}: {reason}")]
    InvalidOverride {
        variable: String,
        value: String,
        reason: String,
    },

    #[error("Cannot create config directory {path}: {source}")]
    DirectoryCreationError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No config directory available: {reason}")]
    PathResolutionError { reason: String },

    #[error("Cannot back up previous config: {source}")]
    BackupError { source: std::io::Error },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A single invalid config field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Field '{field}': {message}{}",
    .value.as_ref().map(|v| format!(" (got: {})", v)).unwrap_or_default()
)]
pub struct ValidationError {
    /// Dotted path to the field (e.g., "catalog.max_title_len")
    pub field: String,
    pub message: String,
    /// The rejected value, when there is one worth showing
    pub value: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    pub fn with_value(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        Self {
            value: Some(value.to_string()),
            ..Self::new(field, message)
        }
    }
}

/// Joins validation errors into a single line for logs and error values
pub(crate) fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
