//! Catalog storage configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use shelfwise_core::types::{DEFAULT_MAX_AUTHOR_LEN, DEFAULT_MAX_TITLE_LEN};
use shelfwise_core::TextBounds;
use std::path::PathBuf;
use std::str::FromStr;

/// Largest accepted title or author length, in characters
pub const MAX_TEXT_LEN: usize = 4096;

/// Which storage engine backs the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Binary search tree
    #[default]
    Tree,
    /// Sorted singly linked list
    List,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Tree => "tree",
            EngineKind::List => "list",
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tree" => Ok(EngineKind::Tree),
            "list" => Ok(EngineKind::List),
            other => Err(format!("unknown engine '{}', expected tree or list", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Data file path, relative to the working directory unless absolute
    pub data_file: PathBuf,

    pub engine: EngineKind,

    /// Titles longer than this are truncated on load
    pub max_title_len: usize,

    /// Authors longer than this are truncated on load
    pub max_author_len: usize,
}

impl CatalogConfig {
    pub fn text_bounds(&self) -> TextBounds {
        TextBounds::new(self.max_title_len, self.max_author_len)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("books.dat"),
            engine: EngineKind::Tree,
            max_title_len: DEFAULT_MAX_TITLE_LEN,
            max_author_len: DEFAULT_MAX_AUTHOR_LEN,
        }
    }
}

impl ConfigSection for CatalogConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::collect_errors(vec![
            Validator::path_not_empty(&self.data_file, "catalog.data_file"),
            Validator::in_range(self.max_title_len, 1, MAX_TEXT_LEN, "catalog.max_title_len"),
            Validator::in_range(
                self.max_author_len,
                1,
                MAX_TEXT_LEN,
                "catalog.max_author_len",
            ),
        ])
    }

    fn merge(&mut self, other: Self) {
        self.data_file = other.data_file;
        self.engine = other.engine;
        self.max_title_len = other.max_title_len;
        self.max_author_len = other.max_author_len;
    }

    fn section_name(&self) -> &'static str {
        "catalog"
    }
}
