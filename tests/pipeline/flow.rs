//! Filtering, ordering and accounting through a running pipeline

use crate::common::{items_for, wait_until, within};
use proctally::core::time::TimeProvider;
use proctally::pipeline::{MemorySink, Pipeline, PipelineConfig, PipelineEvent, WorkItem};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Clock frozen at one instant
struct FrozenClock(Instant);

impl TimeProvider for FrozenClock {
    fn now(&self) -> Instant {
        self.0
    }
}

fn config(capacity: i64, producers: i64, consumers: i64, uid: u32) -> PipelineConfig {
    PipelineConfig::validate(capacity, producers, consumers, uid).unwrap()
}

#[test]
fn test_only_matching_owner_is_consumed_in_order() {
    let sink = Arc::new(MemorySink::new());
    let source = items_for(&[1, 1, 2, 3, 1], Instant::now());

    let pipeline = Pipeline::start(config(2, 1, 1, 1), source.into_iter(), sink.clone()).unwrap();
    wait_until(Duration::from_secs(5), || pipeline.consumed().unwrap() == 3);
    let report = within(Duration::from_secs(5), move || pipeline.stop()).unwrap();

    assert_eq!(sink.produced_ids(), vec![0, 1, 4]);
    assert_eq!(sink.consumed_ids(), vec![0, 1, 4]);
    assert_eq!(report.produced, 3);
    assert_eq!(report.consumed, 3);
}

#[test]
fn test_single_consumer_sees_fifo_order() {
    let sink = Arc::new(MemorySink::new());
    let owners = vec![9; 50];
    let source = items_for(&owners, Instant::now());

    let pipeline = Pipeline::start(config(3, 1, 1, 9), source.into_iter(), sink.clone()).unwrap();
    wait_until(Duration::from_secs(5), || pipeline.consumed().unwrap() == 50);
    within(Duration::from_secs(5), move || pipeline.stop()).unwrap();

    assert_eq!(sink.consumed_ids(), (0..50).collect::<Vec<u64>>());
}

#[test]
fn test_many_consumers_share_items_without_loss_or_duplication() {
    let sink = Arc::new(MemorySink::new());
    let owners = vec![0; 500];
    let source = items_for(&owners, Instant::now());

    let pipeline = Pipeline::start(config(4, 1, 6, 0), source.into_iter(), sink.clone()).unwrap();
    wait_until(Duration::from_secs(10), || pipeline.consumed().unwrap() == 500);
    let report = within(Duration::from_secs(5), move || pipeline.stop()).unwrap();

    let ids = sink.consumed_ids();
    assert_eq!(ids.len(), 500);
    assert_eq!(ids.iter().copied().collect::<HashSet<u64>>().len(), 500);

    // Running totals are assigned under the buffer lock, so each appears once
    let totals: HashSet<u64> = sink
        .events()
        .iter()
        .filter_map(|event| match event {
            PipelineEvent::Consumed { total, .. } => Some(*total),
            _ => None,
        })
        .collect();
    assert_eq!(totals, (1..=500).collect::<HashSet<u64>>());
    assert_eq!(report.still_buffered, 0);
}

#[test]
fn test_elapsed_times_accumulate_exactly() {
    let base = Instant::now();
    let clock = Arc::new(FrozenClock(base + Duration::from_secs(100)));
    let sink = Arc::new(MemorySink::new());
    let source: Vec<WorkItem> = (0..5u64)
        .map(|i| WorkItem::new(i, 7, base + Duration::from_secs(i) + Duration::from_nanos(i)))
        .collect();

    let pipeline =
        Pipeline::start_with_clock(config(2, 1, 3, 7), source.into_iter(), sink.clone(), clock)
            .unwrap();
    wait_until(Duration::from_secs(5), || pipeline.consumed().unwrap() == 5);
    let report = within(Duration::from_secs(5), move || pipeline.stop()).unwrap();

    let expected = Duration::from_secs(490) - Duration::from_nanos(10);
    assert_eq!(report.cumulative_elapsed, expected);
    assert_eq!(
        sink.events().last().map(ToString::to_string).as_deref(),
        Some("The total elapsed time of all processes for UID 7 is 00:08:09")
    );
}
