//! shelfwise catalog engine
//!
//! An in-memory book catalog keyed by id, on one of two storage engines
//! (a binary search tree or a sorted linked list), with a flat text data
//! file that is written in an order that rebuilds a balanced tree on reload.

pub mod catalog;
pub mod error;
pub mod format;
pub mod generator;
pub mod list;
pub mod persistence;
pub mod snapshot;
pub mod store;
pub mod tree;

pub use catalog::{Catalog, CatalogStats, InsertOutcome, Listing, LoanOutcome, ReturnOutcome};
pub use error::{CatalogError, CatalogResult};
pub use list::SortedList;
pub use persistence::{CatalogFile, LoadReport, MalformedLine};
pub use store::CatalogStore;
pub use tree::BookTree;
