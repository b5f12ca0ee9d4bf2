// FILE: crates/catalog/src/error.rs

use shelfwise_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Returns a message suitable for showing to a user
    pub fn user_message(&self) -> String {
        match self {
            Self::App(err) => err.user_message(),
            Self::Io(_) => "A file operation failed. Please try again.".to_string(),
        }
    }

    /// The wrapped application error, if there is one
    pub fn app_error(&self) -> Option<&AppError> {
        match self {
            Self::App(err) => Some(err),
            Self::Io(_) => None,
        }
    }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
