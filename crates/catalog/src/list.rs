//! Sorted singly linked list engine
//!
//! The simpler of the two engines: linear-time lookups, but no shape to
//! degrade. Nodes stay in ascending id order.

use crate::store::CatalogStore;
use shelfwise_core::{Book, BookId};
use std::cmp::Ordering;

type Link = Option<Box<ListNode>>;

#[derive(Debug)]
struct ListNode {
    book: Book,
    next: Link,
}

/// Book storage as a linked list sorted by id
#[derive(Debug, Default)]
pub struct SortedList {
    head: Link,
    len: usize,
}

impl SortedList {
    /// Creates an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first slot whose node id is not below `id`
    fn slot_for(mut cursor: &mut Link, id: BookId) -> &mut Link {
        while let Some(Ordering::Less) = cursor.as_deref().map(|node| node.book.id.cmp(&id)) {
            cursor = match cursor {
                Some(node) => &mut node.next,
                None => break,
            };
        }
        cursor
    }
}

impl CatalogStore for SortedList {
    type Iter<'a> = Iter<'a>;

    const NAME: &'static str = "list";

    fn insert(&mut self, book: Book) -> bool {
        let slot = Self::slot_for(&mut self.head, book.id);

        if slot.as_ref().is_some_and(|node| node.book.id == book.id) {
            return false;
        }

        let next = slot.take();
        *slot = Some(Box::new(ListNode { book, next }));
        self.len += 1;
        true
    }

    fn get(&self, id: BookId) -> Option<&Book> {
        self.iter()
            .find(|book| book.id >= id)
            .filter(|book| book.id == id)
    }

    fn get_mut(&mut self, id: BookId) -> Option<&mut Book> {
        let mut cursor = self.head.as_deref_mut();

        while let Some(node) = cursor {
            match node.book.id.cmp(&id) {
                Ordering::Less => cursor = node.next.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.book),
                Ordering::Greater => return None,
            }
        }

        None
    }

    fn remove(&mut self, id: BookId) -> Option<Book> {
        let slot = Self::slot_for(&mut self.head, id);

        if !slot.as_ref().is_some_and(|node| node.book.id == id) {
            return None;
        }

        let mut node = slot.take()?;
        *slot = node.next.take();
        self.len -= 1;
        Some(node.book)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    fn clear(&mut self) {
        let mut current = self.head.take();
        while let Some(mut node) = current {
            current = node.next.take();
        }
        self.len = 0;
    }
}

impl Drop for SortedList {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<'a> IntoIterator for &'a SortedList {
    type Item = &'a Book;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Front-to-back iterator: ascending id order
pub struct Iter<'a> {
    next: Option<&'a ListNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Book;

    fn next(&mut self) -> Option<&'a Book> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some(&node.book)
    }
}
