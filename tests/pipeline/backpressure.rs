//! Producer blocking on a full buffer

use crate::common::{items_for, wait_until, within};
use proctally::pipeline::{MemorySink, Pipeline, PipelineConfig, ProducerExit};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_second_put_waits_for_a_take() {
    let sink = Arc::new(MemorySink::new());
    let config = PipelineConfig::validate(1, 1, 0, 0).unwrap();
    let source = items_for(&[0, 0, 0], Instant::now());

    let pipeline = Pipeline::start(config, source.into_iter(), sink.clone()).unwrap();
    wait_until(Duration::from_secs(5), || sink.produced_ids().len() == 1);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(sink.produced_ids().len(), 1, "producer must block on a full buffer");

    let buffer = pipeline.buffer();
    assert_eq!(buffer.filled_slots(), 1);
    assert_eq!(buffer.free_slots(), 0);
    let (slot, item) = buffer.take().unwrap();
    assert_eq!((slot, item.id), (0, 0));

    wait_until(Duration::from_secs(5), || sink.produced_ids().len() == 2);
    let report = within(Duration::from_secs(5), move || pipeline.stop()).unwrap();

    assert_eq!(report.produced, 2);
    assert_eq!(report.still_buffered, 1);
    assert_eq!(report.producer_exit, Some(ProducerExit::Interrupted));
}

#[test]
fn test_filled_slots_never_exceed_capacity() {
    let sink = Arc::new(MemorySink::new());
    let config = PipelineConfig::validate(3, 1, 2, 0).unwrap();
    let owners = vec![0; 300];
    let source = items_for(&owners, Instant::now());

    let pipeline = Pipeline::start(config, source.into_iter(), sink.clone()).unwrap();
    let buffer = pipeline.buffer();
    while pipeline.consumed().unwrap() < 300 {
        let len = buffer.len().unwrap();
        assert!(len <= 3, "buffer holds {} items", len);
        assert!(buffer.filled_slots() <= 3);
        thread::yield_now();
    }

    let report = within(Duration::from_secs(5), move || pipeline.stop()).unwrap();
    assert_eq!(report.consumed, 300);
}
