//! Domain types for shelfwise
//!
//! - `book`: the catalog record and its identifier
//! - `common`: shared traits and the bounded-text policy

mod book;
mod common;

// Re-export all public types
pub use book::{Book, BookId};
pub use common::{TextBounds, Validator, DEFAULT_MAX_AUTHOR_LEN, DEFAULT_MAX_TITLE_LEN};
