//! Pipeline event records and the sinks that receive them
//!
//! The pipeline never prints. It hands every event to an [`EventSink`]; the
//! default [`LogSink`] forwards the rendered line to the `log` facade.

use crate::core::sync::lock_or_recover;
use crate::core::time::format_elapsed;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

/// Name the single producer reports under
pub const PRODUCER_NAME: &str = "Producer-1";

/// Something worth reporting happened in the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// The producer stored an accepted item
    Produced {
        /// Running count of items this producer stored
        count: u64,
        slot: usize,
        item_id: u64,
    },
    /// A consumer took an item and accounted for it
    Consumed {
        consumer: String,
        /// Total consumed across all consumers, including this item
        total: u64,
        slot: usize,
        item_id: u64,
        elapsed: Duration,
    },
    /// Final line after every consumer stopped
    Summary {
        owner_filter: u32,
        cumulative_elapsed: Duration,
    },
}

impl fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineEvent::Produced {
                count,
                slot,
                item_id,
            } => write!(
                f,
                "[{}] Produced Item#-{} at buffer index:{} for PID:{}",
                PRODUCER_NAME, count, slot, item_id
            ),
            PipelineEvent::Consumed {
                consumer,
                total,
                slot,
                item_id,
                elapsed,
            } => write!(
                f,
                "[{}] Consumed Item#-{} on buffer index:{} PID:{} Elapsed Time- {}",
                consumer,
                total,
                slot,
                item_id,
                format_elapsed(*elapsed)
            ),
            PipelineEvent::Summary {
                owner_filter,
                cumulative_elapsed,
            } => write!(
                f,
                "The total elapsed time of all processes for UID {} is {}",
                owner_filter,
                format_elapsed(*cumulative_elapsed)
            ),
        }
    }
}

/// Receiver of pipeline events
///
/// Called from producer and consumer threads; consumed events are recorded
/// while the buffer lock is held, so implementations must not block for long
/// and must not touch the buffer.
pub trait EventSink: Send + Sync {
    fn record(&self, event: PipelineEvent);
}

/// Writes each event as one `info` line
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&self, event: PipelineEvent) {
        log::info!("{}", event);
    }
}

/// Keeps every event in memory, in arrival order
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        lock_or_recover(&self.events).clone()
    }

    /// Item ids of all `Consumed` events, in the order they were recorded
    pub fn consumed_ids(&self) -> Vec<u64> {
        lock_or_recover(&self.events)
            .iter()
            .filter_map(|event| match event {
                PipelineEvent::Consumed { item_id, .. } => Some(*item_id),
                _ => None,
            })
            .collect()
    }

    /// Item ids of all `Produced` events, in the order they were recorded
    pub fn produced_ids(&self) -> Vec<u64> {
        lock_or_recover(&self.events)
            .iter()
            .filter_map(|event| match event {
                PipelineEvent::Produced { item_id, .. } => Some(*item_id),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: PipelineEvent) {
        lock_or_recover(&self.events).push(event);
    }
}
