//! Binary search tree engine
//!
//! Books are ordered by id: every id in a node's left subtree is smaller than
//! the node's id, every id in its right subtree is larger. Nodes own their
//! children outright and hold no parent links, so structural changes are made
//! by rewriting the owning `Link` slot in place.
//!
//! The tree is never rebalanced implicitly. Ascending insertion produces a
//! chain, so every walk here (descent, ordered iteration, release) is
//! iterative rather than recursive to stay safe on arbitrarily deep trees.

use crate::store::CatalogStore;
use shelfwise_core::{Book, BookId};
use std::cmp::Ordering;
use std::collections::VecDeque;

pub(crate) type Link = Option<Box<Node>>;

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) book: Book,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl Node {
    pub(crate) fn new(book: Book, left: Link, right: Link) -> Self {
        Self { book, left, right }
    }
}

/// Book storage as an unbalanced binary search tree keyed by id
#[derive(Debug, Default)]
pub struct BookTree {
    root: Link,
    len: usize,
}

impl BookTree {
    /// Creates an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already-ordered subtree of `len` nodes
    pub(crate) fn from_root(root: Link, len: usize) -> Self {
        Self { root, len }
    }

    /// Counts nodes by walking the whole tree
    ///
    /// Always agrees with `len()`; kept as an independent check of the
    /// cached size.
    pub fn count_nodes(&self) -> usize {
        self.iter().count()
    }

    /// Number of levels in the tree (0 when empty)
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut level: Vec<&Node> = self.root.as_deref().into_iter().collect();

        while !level.is_empty() {
            height += 1;
            level = level
                .into_iter()
                .flat_map(|node| [node.left.as_deref(), node.right.as_deref()])
                .flatten()
                .collect();
        }

        height
    }

    /// Breadth-first walk: the root, then each level left to right
    pub fn levels(&self) -> Levels<'_> {
        Levels {
            queue: self.root.as_deref().into_iter().collect(),
        }
    }

    /// Id of the root node, if any
    pub fn root_id(&self) -> Option<BookId> {
        self.root.as_ref().map(|node| node.book.id)
    }

    /// Rebuilds the tree into a perfectly balanced shape, keeping every book
    pub fn rebalance(&mut self) {
        let sorted = self.drain_sorted();
        *self = crate::snapshot::rebuild_balanced(sorted);
    }

    /// Empties the tree, returning its books in ascending id order
    pub fn drain_sorted(&mut self) -> Vec<Book> {
        let mut sorted = Vec::with_capacity(self.len);
        let mut pending: Vec<Box<Node>> = Vec::new();
        let mut current = self.root.take();

        loop {
            while let Some(mut node) = current {
                current = node.left.take();
                pending.push(node);
            }
            match pending.pop() {
                Some(mut node) => {
                    current = node.right.take();
                    sorted.push(node.book);
                }
                None => break,
            }
        }

        self.len = 0;
        sorted
    }

    /// Returns the slot holding `id`, or the empty slot where it would go
    fn slot_for(mut cursor: &mut Link, id: BookId) -> &mut Link {
        loop {
            let ordering = match cursor.as_deref() {
                Some(node) => id.cmp(&node.book.id),
                None => return cursor,
            };

            cursor = match (ordering, cursor) {
                (Ordering::Less, Some(node)) => &mut node.left,
                (Ordering::Greater, Some(node)) => &mut node.right,
                (_, slot) => return slot,
            };
        }
    }

    /// Detaches the smallest book of a subtree, splicing its right child up
    fn take_min(mut cursor: &mut Link) -> Option<Book> {
        while cursor.as_ref()?.left.is_some() {
            cursor = match cursor {
                Some(node) => &mut node.left,
                None => return None,
            };
        }

        let mut node = cursor.take()?;
        *cursor = node.right.take();
        Some(node.book)
    }
}

impl CatalogStore for BookTree {
    type Iter<'a> = Iter<'a>;

    const NAME: &'static str = "tree";

    fn insert(&mut self, book: Book) -> bool {
        let mut cursor = &mut self.root;

        while let Some(node) = cursor {
            cursor = match book.id.cmp(&node.book.id) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => return false,
            };
        }

        *cursor = Some(Box::new(Node::new(book, None, None)));
        self.len += 1;
        true
    }

    fn get(&self, id: BookId) -> Option<&Book> {
        let mut cursor = self.root.as_deref();

        while let Some(node) = cursor {
            cursor = match id.cmp(&node.book.id) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.book),
            };
        }

        None
    }

    fn get_mut(&mut self, id: BookId) -> Option<&mut Book> {
        let mut cursor = self.root.as_deref_mut();

        while let Some(node) = cursor {
            cursor = match id.cmp(&node.book.id) {
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.book),
            };
        }

        None
    }

    fn remove(&mut self, id: BookId) -> Option<Book> {
        let slot = Self::slot_for(&mut self.root, id);
        let node = slot.as_mut()?;

        let removed = if node.left.is_some() && node.right.is_some() {
            // Two children: the in-order successor's record moves up into
            // this node, then the successor's own node is unlinked.
            let successor = Self::take_min(&mut node.right)?;
            std::mem::replace(&mut node.book, successor)
        } else {
            let mut node = slot.take()?;
            *slot = node.left.take().or_else(|| node.right.take());
            node.book
        };

        self.len -= 1;
        Some(removed)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref())
    }

    fn clear(&mut self) {
        let mut pending: Vec<Box<Node>> = self.root.take().into_iter().collect();

        // Children are detached before their parent is freed.
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }

        self.len = 0;
    }
}

impl Drop for BookTree {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<'a> IntoIterator for &'a BookTree {
    type Item = &'a Book;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// In-order iterator: ascending id order
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iter<'a> {
    fn new(root: Option<&'a Node>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut cursor: Option<&'a Node>) {
        while let Some(node) = cursor {
            self.stack.push(node);
            cursor = node.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Book;

    fn next(&mut self) -> Option<&'a Book> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.book)
    }
}

/// Level-order iterator over a growable queue
pub struct Levels<'a> {
    queue: VecDeque<&'a Node>,
}

impl<'a> Iterator for Levels<'a> {
    type Item = &'a Book;

    fn next(&mut self) -> Option<&'a Book> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.left.as_deref());
        self.queue.extend(node.right.as_deref());
        Some(&node.book)
    }
}
