//! Book record and identifier

use crate::types::Validator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Unique identifier for a book in a catalog
///
/// Ordering follows the underlying integer, which is the key order of
/// every catalog engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(i32);

impl BookId {
    /// Creates a BookId from its integer value
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the integer value
    pub const fn get(&self) -> i32 {
        self.0
    }
}

impl From<i32> for BookId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl FromStr for BookId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A catalog record
///
/// `id` is the identity. The remaining fields are only ever changed by the
/// catalog itself (availability on loan/return, or a full field copy when a
/// tree node takes over its in-order successor's record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub available: bool,
}

impl Book {
    /// Creates a new book, available for loan
    pub fn new(id: BookId, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            available: true,
        }
    }

    /// Returns the book with its availability set
    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }
}

impl Validator for Book {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push("Title cannot be empty".to_string());
        }

        if self.author.trim().is_empty() {
            errors.push("Author cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book_is_available() {
        let book = Book::new(BookId::new(5), "T", "A");
        assert_eq!(book.id.get(), 5);
        assert!(book.available);
    }

    #[test]
    fn test_with_availability() {
        let book = Book::new(BookId::new(5), "T", "A").with_availability(false);
        assert!(!book.available);
    }

    #[test]
    fn test_book_id_parse() {
        assert_eq!("42".parse::<BookId>().unwrap(), BookId::new(42));
        assert_eq!(" -7 ".parse::<BookId>().unwrap(), BookId::new(-7));
        assert!("forty".parse::<BookId>().is_err());
        assert!("".parse::<BookId>().is_err());
    }

    #[test]
    fn test_book_id_display_honors_width() {
        assert_eq!(format!("{:>8}|", BookId::new(7)), "       7|");
        assert_eq!(format!("{:<4}|", BookId::new(-12)), "-12 |");
        assert_eq!(format!("{:03}", BookId::new(5)), "005");
    }

    #[test]
    fn test_book_validation() {
        let book = Book::new(BookId::new(1), "   ", "");
        let errors = book.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_book_serializes_with_plain_id() {
        let book = Book::new(BookId::new(3), "Dune", "Frank Herbert");
        let json = serde_json::to_string(&book).unwrap();
        assert!(json.contains("\"id\":3"));
        let back: Book = serde_json::from_str(&json).unwrap();
        assert_eq!(back, book);
    }
}
