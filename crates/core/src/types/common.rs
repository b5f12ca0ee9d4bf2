//! Common types and utilities shared across domain models

use serde::{Deserialize, Serialize};

/// Default maximum title length, in characters
pub const DEFAULT_MAX_TITLE_LEN: usize = 500;

/// Default maximum author length, in characters
pub const DEFAULT_MAX_AUTHOR_LEN: usize = 500;

/// Trait for types that can validate themselves
pub trait Validator {
    /// Validates the instance and returns errors if invalid
    fn validate(&self) -> Result<(), Vec<String>>;

    /// Returns true if the instance is valid
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Length limits for the text fields of a book
///
/// Applied where text enters the system (command line, data file).
/// Catalog engines store whatever they are given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBounds {
    pub max_title_len: usize,
    pub max_author_len: usize,
}

impl TextBounds {
    pub fn new(max_title_len: usize, max_author_len: usize) -> Self {
        Self {
            max_title_len,
            max_author_len,
        }
    }

    /// Cuts a title down to the configured length
    pub fn truncate_title(&self, title: &str) -> String {
        truncate_chars(title, self.max_title_len)
    }

    /// Cuts an author name down to the configured length
    pub fn truncate_author(&self, author: &str) -> String {
        truncate_chars(author, self.max_author_len)
    }
}

impl Default for TextBounds {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TITLE_LEN, DEFAULT_MAX_AUTHOR_LEN)
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}
