//! Time provider abstraction and elapsed-time formatting

#[cfg(test)]
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

/// Abstraction over the monotonic clock for testable time-dependent logic
pub trait TimeProvider: Send + Sync {
    /// Get the current monotonic time (for measuring intervals)
    fn now(&self) -> Instant;
}

/// Production time provider using the actual monotonic clock
#[derive(Default, Clone, Debug)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Format an elapsed duration as `HH:MM:SS`.
///
/// Every field is truncated, never rounded. The hours field is at least two
/// digits wide and grows as needed.
pub fn format_elapsed(elapsed: Duration) -> String {
    let nanos = elapsed.as_nanos();
    format!(
        "{:02}:{:02}:{:02}",
        nanos / NANOS_PER_HOUR,
        (nanos / NANOS_PER_MINUTE) % 60,
        (nanos / NANOS_PER_SECOND) % 60
    )
}

/// Mock time provider for deterministic testing
#[derive(Clone)]
#[cfg(test)]
pub struct MockTimeProvider {
    current_instant: Arc<Mutex<Instant>>,
}

#[cfg(test)]
impl MockTimeProvider {
    /// Create a new mock time provider starting at the real current instant
    pub fn new() -> Self {
        Self {
            current_instant: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Advance monotonic time by the given duration
    pub fn advance_time(&self, duration: Duration) {
        let mut instant = self.current_instant.lock().unwrap();
        *instant += duration;
    }

    /// Set the current instant time
    pub fn set_instant(&self, instant: Instant) {
        let mut current = self.current_instant.lock().unwrap();
        *current = instant;
    }
}

#[cfg(test)]
impl TimeProvider for MockTimeProvider {
    fn now(&self) -> Instant {
        *self.current_instant.lock().unwrap()
    }
}
