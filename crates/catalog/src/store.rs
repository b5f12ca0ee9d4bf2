//! Storage engine seam
//!
//! A catalog is keyed by `BookId` and can sit on any engine that keeps its
//! records unique by id and enumerates them in ascending id order.

use shelfwise_core::{Book, BookId};

/// Ordered, id-unique storage for books
pub trait CatalogStore: Default {
    /// Ascending-id iterator over stored books
    type Iter<'a>: Iterator<Item = &'a Book>
    where
        Self: 'a;

    /// Short engine name for logs and diagnostics
    const NAME: &'static str;

    /// Stores `book` unless its id is already present.
    ///
    /// Returns false, leaving the store untouched, on a duplicate id.
    fn insert(&mut self, book: Book) -> bool;

    fn get(&self, id: BookId) -> Option<&Book>;

    fn get_mut(&mut self, id: BookId) -> Option<&mut Book>;

    /// Removes and returns the book with `id`, if present
    fn remove(&mut self, id: BookId) -> Option<Book>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates in ascending id order
    fn iter(&self) -> Self::Iter<'_>;

    /// Releases every stored book
    fn clear(&mut self);
}
