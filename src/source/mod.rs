//! Item Sources
//!
//! Where the producer's work items come from. The binary scans the live
//! process table; tests and embedders can hand in any
//! `Iterator<Item = WorkItem> + Send`, or a [`VecSource`].

mod error;
mod memory;
pub mod procfs;

pub use error::{SourceError, SourceResult};
pub use memory::VecSource;
pub use procfs::ProcessTable;
