//! Stop protocol liveness and reporting

use crate::common::{items_for, wait_until, within};
use proctally::pipeline::{
    ConsumerExit, MemorySink, Pipeline, PipelineConfig, PipelineEvent, ProducerExit,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn config(capacity: i64, producers: i64, consumers: i64, uid: u32) -> PipelineConfig {
    PipelineConfig::validate(capacity, producers, consumers, uid).unwrap()
}

#[test]
fn test_idle_consumers_all_stop() {
    let sink = Arc::new(MemorySink::new());
    let pipeline = Pipeline::start(config(2, 1, 5, 0), std::iter::empty(), sink.clone()).unwrap();
    thread::sleep(Duration::from_millis(50));

    let report = within(Duration::from_secs(5), move || pipeline.stop()).unwrap();

    assert_eq!(report.consumers.len(), 5);
    for (name, outcome) in &report.consumers {
        assert_eq!(outcome.consumed, 0, "{} consumed unexpectedly", name);
        assert!(matches!(
            outcome.exit,
            ConsumerExit::StopRequested | ConsumerExit::Interrupted
        ));
    }
    assert_eq!(report.producer_exit, Some(ProducerExit::Exhausted));
}

#[test]
fn test_consumer_names_follow_start_order() {
    let sink = Arc::new(MemorySink::new());
    let pipeline = Pipeline::start(config(1, 0, 3, 0), std::iter::empty(), sink).unwrap();

    let report = within(Duration::from_secs(5), move || pipeline.stop()).unwrap();

    let names: Vec<&str> = report.consumers.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["Consumer-1", "Consumer-2", "Consumer-3"]);
}

#[test]
fn test_stop_mid_stream_accounts_every_item() {
    let sink = Arc::new(MemorySink::new());
    let owners = vec![0; 20_000];
    let source = items_for(&owners, Instant::now());

    let pipeline = Pipeline::start(config(4, 1, 3, 0), source.into_iter(), sink.clone()).unwrap();
    wait_until(Duration::from_secs(5), || pipeline.consumed().unwrap() >= 10);
    let report = within(Duration::from_secs(5), move || pipeline.stop()).unwrap();

    assert_eq!(
        report.produced,
        report.consumed + report.still_buffered as u64
    );
    let consumed = sink.consumed_ids();
    assert_eq!(consumed.len() as u64, report.consumed);
    assert_eq!(
        consumed.iter().copied().collect::<HashSet<u64>>().len(),
        consumed.len()
    );
}

#[test]
fn test_summary_is_emitted_once_and_last() {
    let sink = Arc::new(MemorySink::new());
    let source = items_for(&[4, 4], Instant::now());

    let pipeline = Pipeline::start(config(2, 1, 2, 4), source.into_iter(), sink.clone()).unwrap();
    wait_until(Duration::from_secs(5), || pipeline.consumed().unwrap() == 2);
    within(Duration::from_secs(5), move || pipeline.stop()).unwrap();

    let events = sink.events();
    let summaries = events
        .iter()
        .filter(|event| matches!(event, PipelineEvent::Summary { .. }))
        .count();
    assert_eq!(summaries, 1);
    assert!(matches!(
        events.last(),
        Some(PipelineEvent::Summary { owner_filter: 4, .. })
    ));
}

#[test]
fn test_empty_pipeline_stops_immediately() {
    let sink = Arc::new(MemorySink::new());
    let pipeline = Pipeline::start(config(1, 0, 0, 0), std::iter::empty(), sink.clone()).unwrap();

    let report = within(Duration::from_secs(5), move || pipeline.stop()).unwrap();

    assert!(report.consumers.is_empty());
    assert_eq!(report.producer_exit, None);
    assert_eq!(report.consumed, 0);
    assert_eq!(sink.events().len(), 1);
}

#[test]
fn test_dropping_running_pipeline_stops_workers() {
    let sink = Arc::new(MemorySink::new());
    let source = items_for(&[0; 10], Instant::now());
    let pipeline = Pipeline::start(config(2, 1, 0, 0), source.into_iter(), sink.clone()).unwrap();
    wait_until(Duration::from_secs(5), || sink.produced_ids().len() == 2);

    within(Duration::from_secs(5), move || drop(pipeline));

    assert!(matches!(
        sink.events().last(),
        Some(PipelineEvent::Summary { .. })
    ));
}
