//! Generic min-priority queue ordered by a caller-supplied comparator
//!
//! `std::collections::BinaryHeap` requires `T: Ord`, which forces the
//! priority rule into the element type. Consumers here order elements by an
//! extracted key (a deadline, a weight), so the queue takes the comparator
//! as a function instead: the element for which `cmp` returns
//! [`Ordering::Less`] against every other element is served first.
//!
//! Backing storage is a binary heap laid out in a `Vec`. The element with
//! the highest priority (smallest under the comparator) is readable in O(1)
//! via [`PQueue::peek`]; `enqueue`/`dequeue` are O(log n); removal by
//! predicate is a linear scan.
//!
//! The queue never inspects or finalizes its elements beyond comparing
//! them. Every removal path (`dequeue`, `erase`, `drain`) hands ownership
//! back to the caller.

use std::cmp::Ordering;
use std::fmt;

/// Min-priority queue over a `Vec`-backed binary heap.
pub struct PQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    items: Vec<T>,
    cmp: F,
}

impl<T, F> PQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// Create an empty queue with the given priority rule
    pub fn new(cmp: F) -> Self {
        Self { items: Vec::new(), cmp }
    }

    /// Create an empty queue with pre-allocated room for `capacity` elements
    pub fn with_capacity(capacity: usize, cmp: F) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            cmp,
        }
    }

    /// Number of queued elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the queue holds no elements
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert an element according to its priority
    pub fn enqueue(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// The highest-priority element, without removing it
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Remove and return the highest-priority element
    pub fn dequeue(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }

        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let item = self.items.pop();
        self.sift_down(0);
        item
    }

    /// Remove and return the first element matching `pred`
    ///
    /// Scans in heap order, so among equal-priority matches the one returned
    /// is unspecified. Returns `None` if nothing matches.
    pub fn erase<P>(&mut self, pred: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        let pos = self.items.iter().position(|item| pred(item))?;

        let last = self.items.len() - 1;
        self.items.swap(pos, last);
        let item = self.items.pop();

        // The element swapped into `pos` may violate the heap property in
        // either direction relative to its new neighbors.
        if pos < self.items.len() {
            self.sift_down(pos);
            self.sift_up(pos);
        }

        item
    }

    /// Remove every element, yielding them one at a time in storage order
    /// (not priority order)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.items.drain(..)
    }

    /// Drop every element
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if (self.cmp)(&self.items[idx], &self.items[parent]) == Ordering::Less {
                self.items.swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            let mut smallest = idx;

            if left < len && (self.cmp)(&self.items[left], &self.items[smallest]) == Ordering::Less {
                smallest = left;
            }
            if right < len && (self.cmp)(&self.items[right], &self.items[smallest]) == Ordering::Less {
                smallest = right;
            }
            if smallest == idx {
                break;
            }

            self.items.swap(idx, smallest);
            idx = smallest;
        }
    }
}

impl<T, F> fmt::Debug for PQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PQueue").field("len", &self.items.len()).finish()
    }
}
