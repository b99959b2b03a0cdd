//! Common test utilities and helpers
//!
//! Bounded joins and waits, so a hung worker fails a test instead of
//! hanging the suite.

#![allow(dead_code)]

use proctally::pipeline::WorkItem;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Run `f` on its own thread and wait at most `limit` for its result
pub fn within<T, F>(limit: Duration, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx.recv_timeout(limit)
        .unwrap_or_else(|_| panic!("operation did not finish within {:?}", limit))
}

/// Poll `condition` until it holds, failing after `limit`
pub fn wait_until(limit: Duration, mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + limit;
    while !condition() {
        assert!(Instant::now() < deadline, "condition not reached within {:?}", limit);
        thread::sleep(Duration::from_millis(2));
    }
}

/// Items with ids `0..owners.len()`, all started at `started_at`
pub fn items_for(owners: &[u32], started_at: Instant) -> Vec<WorkItem> {
    owners
        .iter()
        .enumerate()
        .map(|(id, owner)| WorkItem::new(id as u64, *owner, started_at))
        .collect()
}
