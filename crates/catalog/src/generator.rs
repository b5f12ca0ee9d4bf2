//! Synthetic catalogs for testing and benchmarking
//!
//! Ids run from 1 to `count`. Titles and authors are `"Book N"` and
//! `"Author N"` with N drawn uniformly from 1..=1000, so they repeat across
//! books the way real data does.

use crate::catalog::Catalog;
use crate::error::CatalogResult;
use crate::snapshot;
use crate::store::CatalogStore;
use rand::Rng;
use shelfwise_core::{AppError, BookId};

const NAME_RANGE: std::ops::RangeInclusive<u32> = 1..=1000;

/// Builds a catalog of `count` available books
///
/// Books are inserted midpoint-first, so a tree-backed result is balanced.
pub fn generate<S: CatalogStore, R: Rng>(
    count: usize,
    rng: &mut R,
) -> CatalogResult<Catalog<S>> {
    let max_id = i32::try_from(count).map_err(|_| AppError::InvalidArgument {
        argument: "count".to_string(),
        reason: format!("at most {} books can be generated", i32::MAX),
    })?;

    let ids: Vec<i32> = (1..=max_id).collect();
    let mut catalog = Catalog::new();

    for &id in snapshot::balanced_order(&ids) {
        let title = format!("Book {}", rng.random_range(NAME_RANGE));
        let author = format!("Author {}", rng.random_range(NAME_RANGE));
        catalog.insert(BookId::new(id), title, author);
    }

    log::debug!("Generated {} books", catalog.len());
    Ok(catalog)
}
