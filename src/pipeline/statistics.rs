//! Aggregate consumption statistics
//!
//! Lives inside the buffer lock (`BoundedBuffer<WorkItem, Statistics>`), so
//! every update happens in the same critical section as the take it
//! accounts for.

use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    total_consumed: u64,
    cumulative_elapsed: Duration,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one consumed item, returning the new total
    pub fn record(&mut self, elapsed: Duration) -> u64 {
        self.total_consumed += 1;
        self.cumulative_elapsed = self.cumulative_elapsed.saturating_add(elapsed);
        self.total_consumed
    }

    pub fn total_consumed(&self) -> u64 {
        self.total_consumed
    }

    pub fn cumulative_elapsed(&self) -> Duration {
        self.cumulative_elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_aggregates_to_the_nanosecond() {
        let mut stats = Statistics::new();
        let samples = [
            Duration::from_nanos(1),
            Duration::from_nanos(999_999_999),
            Duration::from_secs(3600),
            Duration::from_nanos(123_456_789_012),
        ];

        for (index, elapsed) in samples.iter().enumerate() {
            assert_eq!(stats.record(*elapsed), index as u64 + 1);
        }

        assert_eq!(stats.total_consumed(), 4);
        assert_eq!(
            stats.cumulative_elapsed().as_nanos(),
            1 + 999_999_999 + 3_600_000_000_000 + 123_456_789_012
        );
    }

    #[test]
    fn test_new_statistics_are_zero() {
        let stats = Statistics::new();
        assert_eq!(stats.total_consumed(), 0);
        assert_eq!(stats.cumulative_elapsed(), Duration::ZERO);
    }
}
