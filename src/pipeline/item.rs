//! Work items and the source they are scanned from

use std::time::Instant;

/// One unit of work moving through the pipeline
///
/// Immutable once created and moved, never shared: source → producer →
/// buffer slot → consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Opaque identifier (a process id for the process-table source)
    pub id: u64,
    /// Owner the producer filters on (a user id)
    pub owner: u32,
    /// When the underlying work started
    pub started_at: Instant,
}

impl WorkItem {
    pub fn new(id: u64, owner: u32, started_at: Instant) -> Self {
        Self {
            id,
            owner,
            started_at,
        }
    }
}

/// A finite sequence of work items, iterated exactly once by the producer
///
/// Any `Iterator<Item = WorkItem> + Send` qualifies.
pub trait ItemSource: Iterator<Item = WorkItem> + Send {}

impl<I> ItemSource for I where I: Iterator<Item = WorkItem> + Send {}
