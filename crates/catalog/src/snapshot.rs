//! Sorted snapshots of a catalog and balanced reconstruction from them
//!
//! `flatten` captures the ascending sequence of a store. `balanced_order`
//! rearranges a sorted sequence so that each subrange's midpoint comes before
//! both of its halves: replaying that order through plain BST insertion
//! yields a tree of minimal height. `rebuild_balanced` builds the same shape
//! directly.

use crate::store::CatalogStore;
use crate::tree::{BookTree, Link, Node};
use shelfwise_core::Book;

/// Ascending-id references to every book in `store`
pub fn flatten<S: CatalogStore>(store: &S) -> Vec<&Book> {
    let mut sorted = Vec::with_capacity(store.len());
    sorted.extend(store.iter());
    sorted
}

/// Midpoint-first ordering of a sorted slice
///
/// For the inclusive range `[low, high]` the element at `(low + high) / 2`
/// is emitted, then `[low, mid - 1]`, then `[mid + 1, high]`.
pub fn balanced_order<T>(sorted: &[T]) -> Vec<&T> {
    let mut order = Vec::with_capacity(sorted.len());
    emit_midpoints(sorted, &mut order);
    order
}

fn emit_midpoints<'a, T>(range: &'a [T], order: &mut Vec<&'a T>) {
    if range.is_empty() {
        return;
    }

    let mid = (range.len() - 1) / 2;
    order.push(&range[mid]);
    emit_midpoints(&range[..mid], order);
    emit_midpoints(&range[mid + 1..], order);
}

/// Builds a balanced tree from books sorted by ascending, unique id
///
/// Produces the same shape as inserting `balanced_order(&books)` one by one.
pub fn rebuild_balanced(books: Vec<Book>) -> BookTree {
    debug_assert!(books.windows(2).all(|pair| pair[0].id < pair[1].id));

    let len = books.len();
    let mut remaining = books.into_iter();
    let root = build_subtree(&mut remaining, len);
    BookTree::from_root(root, len)
}

fn build_subtree(books: &mut impl Iterator<Item = Book>, count: usize) -> Link {
    if count == 0 {
        return None;
    }

    // Same split as `emit_midpoints`: the left half holds the elements
    // before the midpoint.
    let left_count = (count - 1) / 2;
    let left = build_subtree(books, left_count);
    let book = books.next()?;
    let right = build_subtree(books, count - left_count - 1);

    Some(Box::new(Node::new(book, left, right)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfwise_core::BookId;

    fn books(ids: impl IntoIterator<Item = i32>) -> Vec<Book> {
        ids.into_iter()
            .map(|id| Book::new(BookId::new(id), format!("T{}", id), "A"))
            .collect()
    }

    #[test]
    fn test_flatten_is_sorted_and_exact() {
        let mut tree = BookTree::new();
        for book in books([5, 2, 8, 1, 9, 3]) {
            tree.insert(book);
        }

        let sorted = flatten(&tree);
        assert_eq!(sorted.len(), 6);
        assert_eq!(sorted.capacity(), 6);
        let ids: Vec<i32> = sorted.iter().map(|b| b.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 5, 8, 9]);
    }

    #[test]
    fn test_flatten_empty() {
        let tree = BookTree::new();
        assert!(flatten(&tree).is_empty());
    }

    #[test]
    fn test_balanced_order_seven() {
        let ids: Vec<i32> = (1..=7).collect();
        let order: Vec<i32> = balanced_order(&ids).into_iter().copied().collect();
        assert_eq!(order, vec![4, 2, 1, 3, 6, 5, 7]);
    }

    #[test]
    fn test_balanced_order_even_count_takes_lower_midpoint() {
        let ids: Vec<i32> = (1..=4).collect();
        let order: Vec<i32> = balanced_order(&ids).into_iter().copied().collect();
        // mid of [0, 3] is 1, so id 2 comes first
        assert_eq!(order, vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_balanced_order_edge_sizes() {
        let empty: Vec<i32> = Vec::new();
        assert!(balanced_order(&empty).is_empty());
        assert_eq!(balanced_order(&[42]), vec![&42]);
    }

    #[test]
    fn test_balanced_order_is_a_permutation() {
        let ids: Vec<i32> = (0..1000).collect();
        let mut order: Vec<i32> = balanced_order(&ids).into_iter().copied().collect();
        order.sort_unstable();
        assert_eq!(order, ids);
    }

    #[test]
    fn test_replayed_order_matches_direct_rebuild() {
        let sorted = books(1..=100);

        let mut replayed = BookTree::new();
        for book in balanced_order(&sorted) {
            replayed.insert(book.clone());
        }
        let rebuilt = rebuild_balanced(sorted);

        let replayed_levels: Vec<_> = replayed.levels().map(|b| b.id).collect();
        let rebuilt_levels: Vec<_> = rebuilt.levels().map(|b| b.id).collect();
        assert_eq!(replayed_levels, rebuilt_levels);
        assert_eq!(rebuilt.height(), 7);
        assert_eq!(rebuilt.len(), 100);
    }

    #[test]
    fn test_rebuild_height_is_logarithmic() {
        for n in [1usize, 2, 3, 15, 16, 1023, 1024, 10_000] {
            let tree = rebuild_balanced(books(0..n as i32));
            let expected = (usize::BITS - n.leading_zeros()) as usize;
            assert_eq!(tree.height(), expected, "n = {}", n);
            assert_eq!(tree.count_nodes(), n);
        }
    }

    #[test]
    fn test_rebuild_empty() {
        let tree = rebuild_balanced(Vec::new());
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
    }
}
