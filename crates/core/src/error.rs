//! Error types for shelfwise
//!
//! Catalog operations never fail on missing or duplicate ids; those are
//! ordinary outcomes. The errors here cover the file boundary and bad input,
//! classified by severity:
//! - **Recoverable**: retrying may succeed (transient I/O)
//! - **Degraded**: the current operation was aborted, the catalog is intact

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Error can be automatically recovered from
    Recoverable,
    /// Operation aborted but the catalog remains usable
    Degraded,
}

/// Main error type for shelfwise
#[derive(Error, Debug)]
pub enum AppError {
    // ===== File System Errors =====
    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Permission denied for file operation
    #[error("Permission denied: {operation} on {path}")]
    PermissionDenied { operation: String, path: PathBuf },

    /// A data file could not be opened or created
    #[error("Resource unavailable: {operation} {path}: {source}")]
    ResourceUnavailable {
        operation: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// General I/O error
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: io::Error,
    },

    // ===== Record Errors =====
    /// A persisted line could not be decoded
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    // ===== Generic Errors =====
    /// Invalid argument provided
    #[error("Invalid argument: {argument} - {reason}")]
    InvalidArgument { argument: String, reason: String },
}

impl AppError {
    /// Classifies a failure to open `path` for `operation`
    pub fn open_failed(operation: &str, path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                operation: operation.to_string(),
                path: path.to_path_buf(),
            },
            _ => Self::ResourceUnavailable {
                operation: operation.to_string(),
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Returns the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::IoError { source, .. } | Self::ResourceUnavailable { source, .. }
                if matches!(
                    source.kind(),
                    io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                ) =>
            {
                ErrorSeverity::Recoverable
            }

            _ => ErrorSeverity::Degraded,
        }
    }

    /// Returns a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("The file {} was not found.", path.display())
            }
            Self::PermissionDenied { path, .. } => {
                format!("Permission denied for {}.", path.display())
            }
            Self::ResourceUnavailable { path, .. } => {
                format!("Could not open {}. The catalog was not changed.", path.display())
            }
            Self::IoError { .. } => "A file operation failed. Please try again.".to_string(),
            Self::MalformedRecord { line, .. } => {
                format!("Line {} of the data file could not be read.", line)
            }
            Self::InvalidArgument { argument, reason } => {
                format!("Invalid {}: {}.", argument, reason)
            }
        }
    }

    /// Returns true if this error can be automatically recovered from
    pub fn is_recoverable(&self) -> bool {
        self.severity() == ErrorSeverity::Recoverable
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;
