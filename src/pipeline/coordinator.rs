//! Pipeline lifecycle: startup order, natural producer completion and the
//! stop protocol
//!
//! Stop protocol, run synchronously by [`Pipeline::stop`]:
//! 1. for every consumer: set its stop flag, then post one interrupt token on
//!    the filled-slot semaphore. N consumers get N tokens, so every consumer
//!    blocked in `take` (at most N of them) is woken at least once, and a
//!    consumer between its loop check and `take` finds a token waiting.
//! 2. interrupt and join the producer if it is still running, so a producer
//!    parked on a full buffer cannot keep the host waiting.
//! 3. join every consumer and drop unused tokens.
//! 4. emit the summary event.

use crate::buffer::{BoundedBuffer, BufferError};
use crate::core::time::{SystemTimeProvider, TimeProvider};
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::consumer::{Consumer, ConsumerExit, ConsumerOutcome, StopFlag};
use crate::pipeline::events::{EventSink, PipelineEvent, PRODUCER_NAME};
use crate::pipeline::item::ItemSource;
use crate::pipeline::producer::{Producer, ProducerExit, ProducerOutcome};
use crate::pipeline::statistics::Statistics;
use crate::pipeline::{PipelineError, PipelineResult, SharedBuffer};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Creates the worker threads
trait WorkerSpawner {
    fn spawn<T, F>(&self, name: String, work: F) -> io::Result<JoinHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static;
}

/// Named OS threads
struct OsThreads;

impl WorkerSpawner for OsThreads {
    fn spawn<T, F>(&self, name: String, work: F) -> io::Result<JoinHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        thread::Builder::new().name(name).spawn(work)
    }
}

struct ConsumerHandle {
    name: String,
    stop: StopFlag,
    thread: JoinHandle<ConsumerOutcome>,
}

/// What the pipeline did, reported once every worker has stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownReport {
    pub owner_filter: u32,
    /// Items the producer stored (0 without a producer)
    pub produced: u64,
    /// How the producer finished, if there was one
    pub producer_exit: Option<ProducerExit>,
    /// Items consumed across all consumers
    pub consumed: u64,
    /// Sum of per-item elapsed times
    pub cumulative_elapsed: Duration,
    /// Items produced but never consumed
    pub still_buffered: usize,
    /// Per-consumer outcome, in consumer order
    pub consumers: Vec<(String, ConsumerOutcome)>,
}

struct Running {
    config: PipelineConfig,
    buffer: Arc<SharedBuffer>,
    sink: Arc<dyn EventSink>,
    consumers: Vec<ConsumerHandle>,
    producer: Option<JoinHandle<ProducerOutcome>>,
    producer_outcome: Option<ProducerOutcome>,
    /// Set once the producer thread is known to have panicked
    producer_panicked: bool,
    stopped: bool,
}

/// A started pipeline
///
/// Dropping a pipeline that was not stopped runs the stop protocol.
pub struct Pipeline {
    running: Running,
}

impl Pipeline {
    /// Start consumers, then the producer, using the system clock
    pub fn start<S>(
        config: PipelineConfig,
        source: S,
        sink: Arc<dyn EventSink>,
    ) -> PipelineResult<Self>
    where
        S: ItemSource + 'static,
    {
        Self::start_with_clock(config, source, sink, Arc::new(SystemTimeProvider))
    }

    /// Start with an explicit time provider for elapsed-time accounting
    ///
    /// Buffer and consumer-list storage are reserved before any thread is
    /// created. If a thread cannot be created, every worker started so far
    /// is stopped and joined before the error is returned.
    pub fn start_with_clock<S>(
        config: PipelineConfig,
        source: S,
        sink: Arc<dyn EventSink>,
        clock: Arc<dyn TimeProvider>,
    ) -> PipelineResult<Self>
    where
        S: ItemSource + 'static,
    {
        Self::start_on(config, source, sink, clock, &OsThreads)
    }

    fn start_on<S, W>(
        config: PipelineConfig,
        source: S,
        sink: Arc<dyn EventSink>,
        clock: Arc<dyn TimeProvider>,
        spawner: &W,
    ) -> PipelineResult<Self>
    where
        S: ItemSource + 'static,
        W: WorkerSpawner,
    {
        log::info!(
            "Pipeline starting: buffer_size={} producers={} consumers={} uid={}",
            config.capacity,
            u8::from(config.producer_enabled),
            config.consumer_count,
            config.owner_filter
        );

        let buffer = BoundedBuffer::with_shared(config.capacity, Statistics::new()).map_err(
            |e| match e {
                BufferError::Allocation { capacity } => PipelineError::Allocation {
                    what: "buffer".to_string(),
                    capacity,
                },
                other => PipelineError::Buffer(other),
            },
        )?;

        let mut consumers = Vec::new();
        consumers
            .try_reserve_exact(config.consumer_count)
            .map_err(|_| PipelineError::Allocation {
                what: "consumer list".to_string(),
                capacity: config.consumer_count,
            })?;

        let mut running = Running {
            config,
            buffer: Arc::new(buffer),
            sink,
            consumers,
            producer: None,
            producer_outcome: None,
            producer_panicked: false,
            stopped: false,
        };

        if let Err(e) = running.spawn_workers(source, clock, spawner) {
            if let Err(teardown) = running.shutdown(false) {
                log::error!("Teardown after failed start also failed: {}", teardown);
            }
            return Err(e);
        }

        Ok(Pipeline { running })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.running.config
    }

    /// The shared buffer, for observing progress while running
    pub fn buffer(&self) -> &SharedBuffer {
        &self.running.buffer
    }

    /// Total items consumed so far
    pub fn consumed(&self) -> PipelineResult<u64> {
        Ok(self
            .running
            .buffer
            .with_shared_state(Statistics::total_consumed)?)
    }

    /// Block until the producer finishes on its own
    ///
    /// Consumers keep running. Returns `None` when no producer was started.
    /// Once the producer has panicked, this and [`Pipeline::stop`] keep
    /// reporting `WorkerPanicked`.
    pub fn wait_for_producer(&mut self) -> PipelineResult<Option<ProducerOutcome>> {
        let running = &mut self.running;
        if let Some(handle) = running.producer.take() {
            match handle.join() {
                Ok(outcome) => running.producer_outcome = Some(outcome),
                Err(_) => running.producer_panicked = true,
            }
        }
        if running.producer_panicked {
            return Err(PipelineError::WorkerPanicked {
                worker: PRODUCER_NAME.to_string(),
            });
        }
        Ok(running.producer_outcome.clone())
    }

    /// Run the full stop protocol and report
    pub fn stop(mut self) -> PipelineResult<ShutdownReport> {
        self.running.shutdown(true)
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        if !self.running.stopped {
            if let Err(e) = self.running.shutdown(true) {
                log::error!("Pipeline shutdown on drop failed: {}", e);
            }
        }
    }
}

impl Running {
    fn spawn_workers<S, W>(
        &mut self,
        source: S,
        clock: Arc<dyn TimeProvider>,
        spawner: &W,
    ) -> PipelineResult<()>
    where
        S: ItemSource + 'static,
        W: WorkerSpawner,
    {
        if self.config.consumer_count > 0 {
            log::info!("Creating consumer threads");
        }
        for index in 0..self.config.consumer_count {
            let name = format!("Consumer-{}", index + 1);
            let stop = StopFlag::new();
            let consumer = Consumer::new(
                name.clone(),
                Arc::clone(&self.buffer),
                Arc::clone(&self.sink),
                Arc::clone(&clock),
                stop.clone(),
            );
            let thread = spawner
                .spawn(name.clone(), move || consumer.run())
                .map_err(|source| PipelineError::Spawn {
                    worker: name.clone(),
                    source,
                })?;
            self.consumers.push(ConsumerHandle { name, stop, thread });
        }

        if self.config.producer_enabled {
            log::info!("Creating producer thread");
            let producer = Producer::new(
                source,
                self.config.owner_filter,
                Arc::clone(&self.buffer),
                Arc::clone(&self.sink),
            );
            let thread = spawner
                .spawn(PRODUCER_NAME.to_string(), move || producer.run())
                .map_err(|source| PipelineError::Spawn {
                    worker: PRODUCER_NAME.to_string(),
                    source,
                })?;
            self.producer = Some(thread);
        }

        Ok(())
    }

    fn shutdown(&mut self, emit_summary: bool) -> PipelineResult<ShutdownReport> {
        self.stopped = true;
        log::debug!("Stopping {} consumer(s)", self.consumers.len());
        for consumer in &self.consumers {
            consumer.stop.request_stop();
            self.buffer.interrupt_take();
        }

        if let Some(handle) = self.producer.take() {
            self.buffer.interrupt_put();
            match handle.join() {
                Ok(outcome) => self.producer_outcome = Some(outcome),
                Err(_) => self.producer_panicked = true,
            }
        }
        let mut panicked = Vec::new();
        if self.producer_panicked {
            panicked.push(PRODUCER_NAME.to_string());
        }

        let mut consumers = Vec::with_capacity(self.consumers.len());
        for handle in self.consumers.drain(..) {
            match handle.thread.join() {
                Ok(outcome) => {
                    if let ConsumerExit::Failed(e) = &outcome.exit {
                        log::warn!("{} ended with error: {}", handle.name, e);
                    }
                    consumers.push((handle.name, outcome));
                }
                Err(_) => panicked.push(handle.name),
            }
        }
        self.buffer.clear_interrupts();

        let statistics = self.buffer.with_shared_state(Statistics::clone)?;
        let still_buffered = self.buffer.len()?;

        let owner_filter = self.config.owner_filter;
        if emit_summary {
            self.sink.record(PipelineEvent::Summary {
                owner_filter,
                cumulative_elapsed: statistics.cumulative_elapsed(),
            });
        }

        if let Some(worker) = panicked.into_iter().next() {
            return Err(PipelineError::WorkerPanicked { worker });
        }

        Ok(ShutdownReport {
            owner_filter,
            produced: self
                .producer_outcome
                .as_ref()
                .map_or(0, |outcome| outcome.produced),
            producer_exit: self
                .producer_outcome
                .as_ref()
                .map(|outcome| outcome.exit.clone()),
            consumed: statistics.total_consumed(),
            cumulative_elapsed: statistics.cumulative_elapsed(),
            still_buffered,
            consumers,
        })
    }
}
