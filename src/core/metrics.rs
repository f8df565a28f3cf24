//! Bridge metrics for observability
//!
//! Counters for what happened to the calls arriving from the JVM: how many
//! were emitted, filtered, dropped or rejected, and how the async queue
//! behaved.

use std::sync::atomic::{AtomicU64, Ordering};

/// # Example
///
/// ```
/// use tracing_slf4j::BridgeMetrics;
///
/// let metrics = BridgeMetrics::new();
/// metrics.record_dispatched();
/// metrics.record_dropped();
///
/// assert_eq!(metrics.dispatched(), 1);
/// assert_eq!(metrics.dropped(), 1);
/// ```
#[derive(Debug)]
pub struct BridgeMetrics {
    /// Records handed to the sink successfully
    dispatched: AtomicU64,

    /// Records more verbose than the configured maximum level
    filtered: AtomicU64,

    /// Records the sink refused or failed on
    dropped: AtomicU64,

    /// Calls whose message could not be read (null or undecodable)
    rejected: AtomicU64,

    /// Calls carrying a level code outside the shared table
    unknown_levels: AtomicU64,

    /// Panics caught on the native path or inside a sink
    panics: AtomicU64,

    /// Number of times the async queue was found full
    queue_full_events: AtomicU64,

    /// Number of times a producer waited for queue space
    block_events: AtomicU64,

    /// Error records written synchronously instead of being dropped
    critical_preserved: AtomicU64,

    /// Failures of the inner sink seen by the async worker
    sink_failures: AtomicU64,
}

impl BridgeMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            unknown_levels: AtomicU64::new(0),
            panics: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
            critical_preserved: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn unknown_levels(&self) -> u64 {
        self.unknown_levels.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn panics(&self) -> u64 {
        self.panics.load(Ordering::Relaxed)
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

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    /// Record a record handed to the sink. Returns the previous count.
    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.rejected.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_unknown_level(&self) -> u64 {
        self.unknown_levels.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_panic(&self) -> u64 {
        self.panics.fetch_add(1, Ordering::Relaxed)
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

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Drop rate as a percentage (0.0 - 100.0) of records that reached the
    /// sink stage. Returns 0.0 if nothing got that far.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped() as f64;
        let total = self.dispatched() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        for counter in [
            &self.dispatched,
            &self.filtered,
            &self.dropped,
            &self.rejected,
            &self.unknown_levels,
            &self.panics,
            &self.queue_full_events,
            &self.block_events,
            &self.critical_preserved,
            &self.sink_failures,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for BridgeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for BridgeMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            dispatched: AtomicU64::new(self.dispatched()),
            filtered: AtomicU64::new(self.filtered()),
            dropped: AtomicU64::new(self.dropped()),
            rejected: AtomicU64::new(self.rejected()),
            unknown_levels: AtomicU64::new(self.unknown_levels()),
            panics: AtomicU64::new(self.panics()),
            queue_full_events: AtomicU64::new(self.queue_full_events()),
            block_events: AtomicU64::new(self.block_events()),
            critical_preserved: AtomicU64::new(self.critical_preserved()),
            sink_failures: AtomicU64::new(self.sink_failures()),
        }
    }
}
