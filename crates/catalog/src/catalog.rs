// FILE: crates/catalog/src/catalog.rs

use crate::store::CatalogStore;
use crate::tree::{BookTree, Levels};
use log::debug;
use shelfwise_core::{Book, BookId};

/// Result of adding a book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The id was already taken; the existing record is untouched
    DuplicateId,
}

/// Result of lending a book out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanOutcome {
    Loaned,
    /// The book is already on loan
    Unavailable,
    NotFound,
}

/// Result of bringing a book back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnOutcome {
    Returned,
    /// The book was not on loan
    AlreadyAvailable,
    NotFound,
}

/// Ascending listing of a catalog
#[derive(Debug, PartialEq, Eq)]
pub enum Listing<'a> {
    Empty,
    Books(Vec<&'a Book>),
}

impl Listing<'_> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Listing::Empty)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub total: usize,
    pub available: usize,
    pub on_loan: usize,
}

/// Book catalog keyed by id
///
/// Single-owner and synchronous: callers sharing a catalog across threads
/// must serialize access themselves.
#[derive(Debug, Default)]
pub struct Catalog<S: CatalogStore = BookTree> {
    store: S,
}

impl<S: CatalogStore> Catalog<S> {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self { store: S::default() }
    }

    /// Adds a new, available book. Duplicate ids are rejected.
    pub fn insert(
        &mut self,
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> InsertOutcome {
        if self.store.insert(Book::new(id, title, author)) {
            debug!("Inserted book {} ({})", id, S::NAME);
            InsertOutcome::Inserted
        } else {
            debug!("Ignored duplicate book id {}", id);
            InsertOutcome::DuplicateId
        }
    }

    /// Removes a book, returning it if it was present
    pub fn remove(&mut self, id: BookId) -> Option<Book> {
        let removed = self.store.remove(id);
        if removed.is_some() {
            debug!("Removed book {}", id);
        }
        removed
    }

    pub fn find(&self, id: BookId) -> Option<&Book> {
        self.store.get(id)
    }

    /// Every book in ascending id order
    pub fn list_all(&self) -> Listing<'_> {
        if self.store.is_empty() {
            Listing::Empty
        } else {
            Listing::Books(self.store.iter().collect())
        }
    }

    /// Ascending-id iterator
    pub fn iter(&self) -> S::Iter<'_> {
        self.store.iter()
    }

    pub fn loan(&mut self, id: BookId) -> LoanOutcome {
        match self.store.get_mut(id) {
            Some(book) if book.available => {
                book.available = false;
                debug!("Loaned book {}", id);
                LoanOutcome::Loaned
            }
            Some(_) => LoanOutcome::Unavailable,
            None => LoanOutcome::NotFound,
        }
    }

    pub fn return_book(&mut self, id: BookId) -> ReturnOutcome {
        match self.store.get_mut(id) {
            Some(book) if !book.available => {
                book.available = true;
                debug!("Returned book {}", id);
                ReturnOutcome::Returned
            }
            Some(_) => ReturnOutcome::AlreadyAvailable,
            None => ReturnOutcome::NotFound,
        }
    }

    /// Overwrites a book's availability. Returns false if the id is absent.
    pub fn set_availability(&mut self, id: BookId, available: bool) -> bool {
        match self.store.get_mut(id) {
            Some(book) => {
                book.available = available;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn stats(&self) -> CatalogStats {
        let total = self.store.len();
        let available = self.store.iter().filter(|book| book.available).count();

        CatalogStats {
            total,
            available,
            on_loan: total - available,
        }
    }

    /// Name of the underlying storage engine
    pub fn engine(&self) -> &'static str {
        S::NAME
    }

    /// Read access to the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl Catalog<BookTree> {
    /// Books in breadth-first tree order
    pub fn levels(&self) -> Levels<'_> {
        self.store.levels()
    }

    /// Current tree height; 0 for an empty catalog
    pub fn height(&self) -> usize {
        self.store.height()
    }

    /// Rebuilds the tree into a balanced shape in place
    pub fn rebalance(&mut self) {
        let before = self.store.height();
        self.store.rebalance();
        debug!(
            "Rebalanced {} books: height {} -> {}",
            self.store.len(),
            before,
            self.store.height()
        );
    }
}
