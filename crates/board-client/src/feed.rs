//! Bounded, most-recent-first window of feedback records

use std::collections::VecDeque;

use board_core::{Feedback, DEFAULT_WINDOW_SIZE};

/// The records a board currently shows, newest first
///
/// Never holds more than `capacity` records. Order is exactly the order
/// records were given in: an initial read is kept as returned and every
/// later arrival goes to the front. Nothing is ever re-sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedWindow {
    records: VecDeque<Feedback>,
    capacity: usize,
}

impl FeedWindow {
    /// Create an empty window; a capacity of zero is raised to one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Set contents from an initial read, keeping the leading `capacity` records
    pub fn replace(&mut self, records: impl IntoIterator<Item = Feedback>) {
        self.records.clear();
        self.records.extend(records.into_iter().take(self.capacity));
    }

    /// Prepend a new arrival, returning the record evicted from the tail
    pub fn push(&mut self, record: Feedback) -> Option<Feedback> {
        self.records.push_front(record);
        if self.records.len() > self.capacity {
            self.records.pop_back()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate newest first
    pub fn iter(&self) -> impl Iterator<Item = &Feedback> {
        self.records.iter()
    }

    /// Owned copy of the contents, newest first
    pub fn records(&self) -> Vec<Feedback> {
        self.records.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl Default for FeedWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}
