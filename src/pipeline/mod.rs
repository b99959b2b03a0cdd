//! Producer/Consumer Pipeline Component
//!
//! One optional producer fills a shared [`BoundedBuffer`] with work items for
//! a single owner; any number of consumers drain it and account how long
//! each item has existed.
//!
//! # Overview
//!
//! - **Filtering**: the producer stores only items whose owner matches
//! - **Accounting**: consumed count and cumulative elapsed time live under the
//!   buffer lock, so they always agree with what left the buffer
//! - **Bounded shutdown**: [`Pipeline::stop`] wakes every blocked worker and
//!   joins them all before reporting
//!
//! # Example Usage
//!
//! ```rust
//! use proctally::pipeline::{MemorySink, Pipeline, PipelineConfig, WorkItem};
//! use std::sync::Arc;
//! use std::time::Instant;
//!
//! let config = PipelineConfig::validate(4, 1, 2, 1000).unwrap();
//! let now = Instant::now();
//! let items = vec![WorkItem::new(1, 1000, now), WorkItem::new(2, 0, now)];
//! let sink = Arc::new(MemorySink::new());
//!
//! let mut pipeline = Pipeline::start(config, items.into_iter(), sink.clone()).unwrap();
//! pipeline.wait_for_producer().unwrap();
//! while pipeline.consumed().unwrap() < 1 {
//!     std::thread::yield_now();
//! }
//! let report = pipeline.stop().unwrap();
//! assert_eq!(report.consumed, 1);
//! assert_eq!(sink.consumed_ids(), vec![1]);
//! ```

mod config;
mod consumer;
mod coordinator;
mod events;
mod item;
mod producer;
mod statistics;

use crate::buffer::{BoundedBuffer, BufferError};
use crate::core::validation::ValidationError;

pub use config::PipelineConfig;
pub use consumer::{Consumer, ConsumerExit, ConsumerOutcome, StopFlag};
pub use coordinator::{Pipeline, ShutdownReport};
pub use events::{EventSink, LogSink, MemorySink, PipelineEvent, PRODUCER_NAME};
pub use item::{ItemSource, WorkItem};
pub use producer::{Producer, ProducerExit, ProducerOutcome};
pub use statistics::Statistics;

/// Buffer of work items with the statistics record sharing its lock
pub type SharedBuffer = BoundedBuffer<WorkItem, Statistics>;

/// Pipeline lifecycle errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Configuration(#[from] ValidationError),

    #[error("Cannot allocate {what} for {capacity} entries")]
    Allocation { what: String, capacity: usize },

    #[error("Cannot start {worker}: {source}")]
    Spawn {
        worker: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{worker} panicked")]
    WorkerPanicked { worker: String },

    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),
}

impl crate::core::error_handling::ContextualError for PipelineError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, PipelineError::Configuration(_))
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            PipelineError::Configuration(e) => Some(e.details()),
            _ => None,
        }
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
