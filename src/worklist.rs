extern crate alloc;
use alloc::vec::Vec;

use core::cmp::Ordering;

/// Three-way ordering used to rank worklist items.
pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// A collection that always hands out its current maximum.
///
/// Items are kept unordered until [`pop`](Self::pop) needs one; the sort then
/// holds until the next [`push`](Self::push).
pub struct RankedWorklist<T> {
    items: Vec<T>,
    compare: Comparator<T>,
    sorted: bool,
}

impl<T> RankedWorklist<T> {
    pub fn new(compare: Comparator<T>) -> Self {
        Self {
            items: Vec::new(),
            compare,
            sorted: false,
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.sorted = false;
    }

    /// Remove and return the greatest item under the comparator.
    pub fn pop(&mut self) -> Option<T> {
        self.sort();
        self.items.pop()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items, greatest first.
    pub fn into_ranked(mut self) -> Vec<T> {
        self.sort();
        self.items.reverse();
        self.items
    }

    fn sort(&mut self) {
        if !self.sorted {
            self.items.sort_by(self.compare);
            self.sorted = true;
        }
    }
}

impl<T> Extend<T> for RankedWorklist<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
        self.sorted = false;
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for RankedWorklist<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RankedWorklist")
            .field("items", &self.items)
            .field("sorted", &self.sorted)
            .finish()
    }
}
