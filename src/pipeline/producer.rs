//! Producer: scans the item source and feeds accepted items into the buffer
//!
//! Idle → Scanning → (per item) Filtering → [Blocked-on-space → Writing]
//! → Scanning → Done. There is at most one producer per pipeline.

use crate::buffer::BufferError;
use crate::pipeline::events::{EventSink, PipelineEvent, PRODUCER_NAME};
use crate::pipeline::item::ItemSource;
use crate::pipeline::SharedBuffer;
use std::sync::Arc;

/// How the producer reached Done
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProducerExit {
    /// The source ran out of items
    Exhausted,
    /// A `put` was interrupted by a stop request
    Interrupted,
    /// The buffer reported a non-recoverable error
    Failed(BufferError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerOutcome {
    /// Items stored in the buffer
    pub produced: u64,
    pub exit: ProducerExit,
}

pub struct Producer<S> {
    source: S,
    owner_filter: u32,
    buffer: Arc<SharedBuffer>,
    sink: Arc<dyn EventSink>,
}

impl<S: ItemSource> Producer<S> {
    pub fn new(
        source: S,
        owner_filter: u32,
        buffer: Arc<SharedBuffer>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            source,
            owner_filter,
            buffer,
            sink,
        }
    }

    /// Drain the source once, in source order
    ///
    /// Items owned by anyone other than the filter owner are dropped without
    /// side effects.
    pub fn run(self) -> ProducerOutcome {
        let Producer {
            source,
            owner_filter,
            buffer,
            sink,
        } = self;
        let mut produced = 0u64;

        for item in source.filter(|item| item.owner == owner_filter) {
            let item_id = item.id;
            match buffer.put(item) {
                Ok(slot) => {
                    produced += 1;
                    sink.record(PipelineEvent::Produced {
                        count: produced,
                        slot,
                        item_id,
                    });
                }
                Err(BufferError::Interrupted) => {
                    log::debug!("{} interrupted after {} items", PRODUCER_NAME, produced);
                    return ProducerOutcome {
                        produced,
                        exit: ProducerExit::Interrupted,
                    };
                }
                Err(e) => {
                    log::error!("{} stopping: {}", PRODUCER_NAME, e);
                    return ProducerOutcome {
                        produced,
                        exit: ProducerExit::Failed(e),
                    };
                }
            }
        }

        log::debug!(
            "{} finished scanning, {} items produced",
            PRODUCER_NAME,
            produced
        );
        ProducerOutcome {
            produced,
            exit: ProducerExit::Exhausted,
        }
    }
}
