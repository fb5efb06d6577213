//! Dispatcher metrics for observability
//!
//! Counters for monitoring the dispatcher's health: how many entries were
//! posted, filtered by the level rules, delivered, or lost to sink failures.

use std::sync::atomic::{AtomicU64, Ordering};

/// Entries posted while no dispatcher was active, process-wide.
static DROPPED_INACTIVE: AtomicU64 = AtomicU64::new(0);

/// # Example
///
/// ```
/// use logxx::DispatcherMetrics;
///
/// let metrics = DispatcherMetrics::new();
/// metrics.record_posted();
/// metrics.record_delivered();
///
/// assert_eq!(metrics.posted(), 1);
/// assert_eq!(metrics.delivered(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DispatcherMetrics {
    /// Entries accepted into the pending queue
    posted: AtomicU64,

    /// Entries suppressed by the level resolver
    filtered: AtomicU64,

    /// Entries handed to every sink without failure
    delivered: AtomicU64,

    /// Individual sink writes that returned an error or panicked
    sink_failures: AtomicU64,
}

impl DispatcherMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            posted: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn posted(&self) -> u64 {
        self.posted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    /// Entries posted anywhere in the process while no dispatcher was active
    #[inline]
    pub fn dropped_inactive() -> u64 {
        DROPPED_INACTIVE.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_posted(&self) -> u64 {
        self.posted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn record_dropped_inactive() -> u64 {
        DROPPED_INACTIVE.fetch_add(1, Ordering::Relaxed)
    }

    /// Filtered entries as a percentage of processed ones (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been processed.
    pub fn filter_rate(&self) -> f64 {
        let filtered = self.filtered() as f64;
        let processed = filtered + self.delivered() as f64;
        if processed == 0.0 {
            0.0
        } else {
            filtered / processed * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = DispatcherMetrics::new();
        assert_eq!(metrics.posted(), 0);
        assert_eq!(metrics.filtered(), 0);
        assert_eq!(metrics.delivered(), 0);
        assert_eq!(metrics.sink_failures(), 0);
        assert_eq!(metrics.filter_rate(), 0.0);
    }

    #[test]
    fn test_filter_rate() {
        let metrics = DispatcherMetrics::new();
        for _ in 0..75 {
            metrics.record_delivered();
        }
        for _ in 0..25 {
            metrics.record_filtered();
        }
        let rate = metrics.filter_rate();
        assert!((24.9..=25.1).contains(&rate), "Filter rate was {}", rate);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = DispatcherMetrics::new();
        assert_eq!(metrics.record_sink_failure(), 0);
        assert_eq!(metrics.record_sink_failure(), 1);
        assert_eq!(metrics.sink_failures(), 2);
    }
}
