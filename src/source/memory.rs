//! In-memory item source

use crate::pipeline::WorkItem;
use std::time::Instant;

/// Fixed list of work items, yielded in insertion order
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    items: std::collections::VecDeque<WorkItem>,
}

impl VecSource {
    pub fn new(items: Vec<WorkItem>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// Items with ids `first..first + owners.len()`, one per owner, all
    /// started at `started_at`
    pub fn from_owners(first: u64, owners: &[u32], started_at: Instant) -> Self {
        (first..)
            .zip(owners)
            .map(|(id, owner)| WorkItem::new(id, *owner, started_at))
            .collect()
    }

    pub fn push(&mut self, item: WorkItem) {
        self.items.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Iterator for VecSource {
    type Item = WorkItem;

    fn next(&mut self) -> Option<WorkItem> {
        self.items.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.items.len(), Some(self.items.len()))
    }
}

impl FromIterator<WorkItem> for VecSource {
    fn from_iter<I: IntoIterator<Item = WorkItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
