//! Driver metrics for observability
//!
//! Counters for delivered and dropped records, sink failures, and queue
//! pressure in the async driver.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for driver observability
///
/// # Example
///
/// ```
/// use rust_field_logger::DriverMetrics;
///
/// let metrics = DriverMetrics::new();
///
/// metrics.record_dropped();
/// metrics.record_delivered();
///
/// assert_eq!(metrics.dropped_count(), 1);
/// assert_eq!(metrics.delivered_count(), 1);
/// ```
#[derive(Debug)]
pub struct DriverMetrics {
    /// Records handed to the sink and hooks
    delivered: AtomicU64,

    /// Records lost to queue overflow
    dropped_count: AtomicU64,

    /// Sink writes that returned an error or panicked
    sink_failures: AtomicU64,

    /// Number of times the queue was found full
    queue_full_events: AtomicU64,

    /// Number of times a producer waited for queue space
    block_events: AtomicU64,

    /// Critical records written inline because the queue was full
    critical_preserved: AtomicU64,
}

impl DriverMetrics {
    pub const fn new() -> Self {
        Self {
            delivered: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
            critical_preserved: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn delivered_count(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn critical_preserved(&self) -> u64 {
        self.critical_preserved.load(Ordering::Relaxed)
    }

    /// Returns the previous value
    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns the previous value
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_critical_preserved(&self) -> u64 {
        self.critical_preserved.fetch_add(1, Ordering::Relaxed)
    }

    /// Drop rate as a percentage (0.0 - 100.0); 0.0 before any traffic
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.delivered_count() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.delivered.store(0, Ordering::Relaxed);
        self.dropped_count.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
        self.queue_full_events.store(0, Ordering::Relaxed);
        self.block_events.store(0, Ordering::Relaxed);
        self.critical_preserved.store(0, Ordering::Relaxed);
    }
}

impl Default for DriverMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DriverMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            delivered: AtomicU64::new(self.delivered_count()),
            dropped_count: AtomicU64::new(self.dropped_count()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            queue_full_events: AtomicU64::new(self.queue_full_events()),
            block_events: AtomicU64::new(self.block_events()),
            critical_preserved: AtomicU64::new(self.critical_preserved()),
        }
    }
}
