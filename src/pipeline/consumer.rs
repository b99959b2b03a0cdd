//! Consumer: drains the buffer and accounts elapsed time per item
//!
//! Running → [Blocked-on-data → Reading → Accounting] → Running → Stopped.
//! A consumer leaves Running when its stop flag is observed at the top of
//! the loop or when its `take` is interrupted.

use crate::buffer::BufferError;
use crate::core::time::TimeProvider;
use crate::pipeline::events::{EventSink, PipelineEvent};
use crate::pipeline::SharedBuffer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How a consumer reached Stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumerExit {
    /// Stop flag observed at the loop check
    StopRequested,
    /// A `take` was interrupted
    Interrupted,
    /// The buffer reported a non-recoverable error
    Failed(BufferError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerOutcome {
    /// Items this instance consumed
    pub consumed: u64,
    pub exit: ConsumerExit,
}

/// Shared "should stop" flag for one consumer
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn should_stop(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub struct Consumer {
    name: String,
    buffer: Arc<SharedBuffer>,
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn TimeProvider>,
    stop: StopFlag,
}

impl Consumer {
    pub fn new(
        name: String,
        buffer: Arc<SharedBuffer>,
        sink: Arc<dyn EventSink>,
        clock: Arc<dyn TimeProvider>,
        stop: StopFlag,
    ) -> Self {
        Self {
            name,
            buffer,
            sink,
            clock,
            stop,
        }
    }

    /// Consume until stopped
    ///
    /// The statistics update, the elapsed computation and the event all
    /// happen inside the buffer's critical section for the take.
    pub fn run(self) -> ConsumerOutcome {
        let mut consumed = 0u64;

        let exit = loop {
            if self.stop.should_stop() {
                break ConsumerExit::StopRequested;
            }

            let taken = self.buffer.take_with(|slot, item, stats| {
                let elapsed = self.clock.now().saturating_duration_since(item.started_at);
                let total = stats.record(elapsed);
                self.sink.record(PipelineEvent::Consumed {
                    consumer: self.name.clone(),
                    total,
                    slot,
                    item_id: item.id,
                    elapsed,
                });
            });

            match taken {
                Ok(_) => consumed += 1,
                Err(BufferError::Interrupted) => break ConsumerExit::Interrupted,
                Err(e) => {
                    log::error!("{} stopping: {}", self.name, e);
                    break ConsumerExit::Failed(e);
                }
            }
        };

        ConsumerOutcome { consumed, exit }
    }
}

impl Drop for Consumer {
    fn drop(&mut self) {
        log::debug!("{} stopped", self.name);
    }
}
