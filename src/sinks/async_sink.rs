//! Queue and worker thread in front of another sink
//!
//! JVM threads only pay for a channel send; the worker drains the queue in
//! batches and calls the inner sink.

use crate::core::dispatcher::panic_message;
use crate::core::{
    BridgeError, BridgeMetrics, LogLevel, LogRecord, LogSink, OverflowCallback, OverflowPolicy,
    Result,
};
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default time to wait for the worker when the sink is dropped (5 seconds)
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// How long [`AsyncSink::flush`] waits for the worker to catch up
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

const BATCH_SIZE: usize = 50;
const BATCH_LINGER: Duration = Duration::from_millis(10);

enum Job {
    Record(LogRecord),
    Flush(Sender<()>),
}

pub struct AsyncSink {
    inner: Arc<dyn LogSink>,
    sender: RwLock<Option<Sender<Job>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    capacity: usize,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    metrics: Arc<BridgeMetrics>,
    overflow_drops: AtomicU64,
}

impl AsyncSink {
    pub fn new(inner: Arc<dyn LogSink>, capacity: usize) -> Result<Self> {
        Self::with_config(
            inner,
            capacity,
            OverflowPolicy::default(),
            None,
            Arc::new(BridgeMetrics::new()),
        )
    }

    pub fn with_config(
        inner: Arc<dyn LogSink>,
        capacity: usize,
        overflow_policy: OverflowPolicy,
        on_overflow: Option<OverflowCallback>,
        metrics: Arc<BridgeMetrics>,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(BridgeError::config("async_buffer", "must be greater than zero"));
        }

        let (sender, receiver) = bounded(capacity);
        let worker_inner = Arc::clone(&inner);
        let worker_metrics = Arc::clone(&metrics);

        let handle = thread::Builder::new()
            .name("tracing-slf4j-async".to_string())
            .spawn(move || Self::run_worker(receiver, worker_inner, worker_metrics))?;

        Ok(Self {
            inner,
            sender: RwLock::new(Some(sender)),
            worker: Mutex::new(Some(handle)),
            capacity,
            overflow_policy,
            on_overflow,
            metrics,
            overflow_drops: AtomicU64::new(0),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of records waiting for the worker
    pub fn pending(&self) -> usize {
        self.sender.read().as_ref().map_or(0, |s| s.len())
    }

    /// Number of records dropped because the queue was full
    pub fn overflow_drops(&self) -> u64 {
        self.overflow_drops.load(Ordering::Relaxed)
    }

    fn run_worker(receiver: Receiver<Job>, inner: Arc<dyn LogSink>, metrics: Arc<BridgeMetrics>) {
        let mut batch = Vec::with_capacity(BATCH_SIZE);

        loop {
            match receiver.recv() {
                Ok(job) => batch.push(job),
                Err(_) => break,
            }

            Self::fill_batch(&receiver, &mut batch);

            // Small batch without a pending flush: give producers a moment
            let has_flush = batch.iter().any(|job| matches!(job, Job::Flush(_)));
            if batch.len() < BATCH_SIZE && !has_flush {
                thread::sleep(BATCH_LINGER);
                Self::fill_batch(&receiver, &mut batch);
            }

            Self::process_batch(&inner, &mut batch, &metrics);
        }

        if let Err(e) = inner.flush() {
            eprintln!("[TRACING-SLF4J ERROR] Final flush of '{}' failed: {}", inner.name(), e);
        }
    }

    fn fill_batch(receiver: &Receiver<Job>, batch: &mut Vec<Job>) {
        while batch.len() < BATCH_SIZE {
            match receiver.try_recv() {
                Ok(job) => batch.push(job),
                Err(_) => break,
            }
        }
    }

    fn process_batch(inner: &Arc<dyn LogSink>, batch: &mut Vec<Job>, metrics: &BridgeMetrics) {
        for job in batch.drain(..) {
            match job {
                Job::Record(record) => Self::write(inner, &record, metrics),
                Job::Flush(ack) => {
                    if let Err(e) = inner.flush() {
                        eprintln!("[TRACING-SLF4J ERROR] Flush of '{}' failed: {}", inner.name(), e);
                    }
                    let _ = ack.send(());
                }
            }
        }
    }

    fn write(inner: &Arc<dyn LogSink>, record: &LogRecord, metrics: &BridgeMetrics) {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| inner.emit(record)));

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                metrics.record_sink_failure();
                eprintln!("[TRACING-SLF4J ERROR] Sink '{}' failed (async): {}", inner.name(), e);
            }
            Err(panic_info) => {
                metrics.record_sink_failure();
                metrics.record_panic();
                eprintln!(
                    "[TRACING-SLF4J CRITICAL] Sink '{}' panicked (async): {}. Worker continues.",
                    inner.name(),
                    panic_message(panic_info.as_ref())
                );
            }
        }
    }

    fn handle_overflow(&self, sender: &Sender<Job>, record: LogRecord) -> Result<()> {
        self.metrics.record_queue_full();

        match &self.overflow_policy {
            OverflowPolicy::Block => {
                self.metrics.record_block();
                sender
                    .send(Job::Record(record))
                    .map_err(|_| BridgeError::QueueClosed)
            }
            OverflowPolicy::BlockWithTimeout(timeout) => {
                self.metrics.record_block();
                match sender.send_timeout(Job::Record(record), *timeout) {
                    Ok(()) => Ok(()),
                    Err(SendTimeoutError::Timeout(Job::Record(record)))
                        if record.level == LogLevel::Error =>
                    {
                        self.write_critical(&record)
                    }
                    Err(SendTimeoutError::Timeout(_)) => self.alert_and_drop(),
                    Err(SendTimeoutError::Disconnected(_)) => Err(BridgeError::QueueClosed),
                }
            }
            _ if record.level == LogLevel::Error => self.write_critical(&record),
            OverflowPolicy::DropNewest => {
                self.overflow_drops.fetch_add(1, Ordering::Relaxed);
                Err(BridgeError::QueueFull {
                    capacity: self.capacity,
                })
            }
            OverflowPolicy::AlertAndDrop => self.alert_and_drop(),
        }
    }

    /// Last resort for an error record the queue would otherwise lose. It
    /// reaches the inner sink ahead of records still queued.
    fn write_critical(&self, record: &LogRecord) -> Result<()> {
        self.metrics.record_critical_preserved();
        self.inner.emit(record)
    }

    fn alert_and_drop(&self) -> Result<()> {
        let dropped = self.overflow_drops.fetch_add(1, Ordering::Relaxed) + 1;

        if dropped == 1 || dropped.is_multiple_of(1000) {
            eprintln!(
                "[TRACING-SLF4J WARNING] Queue full, {} records dropped. \
                 Consider a larger async buffer or a blocking overflow policy.",
                dropped
            );
            if let Some(ref callback) = self.on_overflow {
                callback(dropped);
            }
        }

        Err(BridgeError::QueueFull {
            capacity: self.capacity,
        })
    }

    /// Close the queue and wait for the worker to drain it.
    ///
    /// Returns `false` if the worker did not finish within `timeout` or
    /// panicked. Records emitted afterwards fail with
    /// [`BridgeError::QueueClosed`].
    pub fn shutdown(&self, timeout: Duration) -> bool {
        drop(self.sender.write().take());

        let Some(handle) = self.worker.lock().take() else {
            return true;
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[TRACING-SLF4J ERROR] Async worker panicked during shutdown: {:?}", e);
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[TRACING-SLF4J WARNING] Async worker did not finish within {:?}. \
                     Some records may be lost.",
                    timeout
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl LogSink for AsyncSink {
    fn emit(&self, record: &LogRecord) -> Result<()> {
        let guard = self.sender.read();
        let Some(sender) = guard.as_ref() else {
            return Err(BridgeError::QueueClosed);
        };

        match sender.try_send(Job::Record(record.clone())) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(Job::Record(record))) => self.handle_overflow(sender, record),
            Err(TrySendError::Full(Job::Flush(_))) => Ok(()),
            Err(TrySendError::Disconnected(_)) => Err(BridgeError::QueueClosed),
        }
    }

    /// Waits until every record queued before this call reached the inner sink
    /// and the inner sink was flushed.
    fn flush(&self) -> Result<()> {
        let (ack_tx, ack_rx) = bounded(1);
        {
            let guard = self.sender.read();
            let Some(sender) = guard.as_ref() else {
                return self.inner.flush();
            };
            sender
                .send_timeout(Job::Flush(ack_tx), DEFAULT_FLUSH_TIMEOUT)
                .map_err(|_| BridgeError::sink("timed out queueing flush request"))?;
        }

        ack_rx
            .recv_timeout(DEFAULT_FLUSH_TIMEOUT)
            .map_err(|_| BridgeError::sink("async worker did not acknowledge flush"))
    }

    fn name(&self) -> &str {
        "async"
    }
}

impl Drop for AsyncSink {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

        let dropped = self.overflow_drops();
        if dropped > 0 {
            eprintln!(
                "[TRACING-SLF4J WARNING] Async sink shutting down with {} records dropped on overflow",
                dropped
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;
    use std::sync::atomic::AtomicBool;

    /// Blocks every emit until released, so the queue can be filled.
    struct GateSink {
        entered: Arc<AtomicBool>,
        open: Arc<AtomicBool>,
        inner: MemorySink,
    }

    impl LogSink for GateSink {
        fn emit(&self, record: &LogRecord) -> Result<()> {
            self.entered.store(true, Ordering::Release);
            while !self.open.load(Ordering::Acquire) {
                thread::sleep(Duration::from_millis(1));
            }
            self.inner.emit(record)
        }

        fn name(&self) -> &str {
            "gate"
        }
    }

    struct Gate {
        entered: Arc<AtomicBool>,
        open: Arc<AtomicBool>,
        memory: MemorySink,
    }

    impl Gate {
        fn new() -> Self {
            Self {
                entered: Arc::new(AtomicBool::new(false)),
                open: Arc::new(AtomicBool::new(false)),
                memory: MemorySink::new(),
            }
        }

        fn sink(&self) -> Arc<dyn LogSink> {
            Arc::new(GateSink {
                entered: Arc::clone(&self.entered),
                open: Arc::clone(&self.open),
                inner: self.memory.clone(),
            })
        }

        /// Park the worker inside the inner sink; the queue is empty afterwards.
        fn park_worker(&self, sink: &AsyncSink) {
            sink.emit(&LogRecord::new(LogLevel::Info, "parked")).unwrap();
            while !self.entered.load(Ordering::Acquire) {
                thread::sleep(Duration::from_millis(1));
            }
        }

        fn release(&self) {
            self.open.store(true, Ordering::Release);
        }
    }

    #[test]
    fn test_flush_drains_everything_before_it() {
        let memory = MemorySink::new();
        let sink = AsyncSink::new(Arc::new(memory.clone()), 128).unwrap();

        for i in 0..100 {
            sink.emit(&LogRecord::new(LogLevel::Info, format!("m{}", i)))
                .unwrap();
        }
        sink.flush().unwrap();

        let messages = memory.messages();
        assert_eq!(messages.len(), 100);
        assert_eq!(messages[0], "m0");
        assert_eq!(messages[99], "m99");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = AsyncSink::new(Arc::new(MemorySink::new()), 0);
        assert!(matches!(result, Err(BridgeError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_drop_newest_when_full() {
        let gate = Gate::new();
        let metrics = Arc::new(BridgeMetrics::new());
        let sink = AsyncSink::with_config(
            gate.sink(),
            1,
            OverflowPolicy::DropNewest,
            None,
            Arc::clone(&metrics),
        )
        .unwrap();
        gate.park_worker(&sink);

        let mut refused = 0;
        for i in 0..20 {
            if sink
                .emit(&LogRecord::new(LogLevel::Debug, format!("d{}", i)))
                .is_err()
            {
                refused += 1;
            }
        }

        // one record fits in the queue, the rest overflow
        assert_eq!(refused, 19);
        assert_eq!(sink.overflow_drops(), 19);
        assert_eq!(metrics.queue_full_events(), 19);

        gate.release();
        sink.flush().unwrap();
        assert_eq!(gate.memory.messages(), vec!["parked".to_string(), "d0".to_string()]);
    }

    #[test]
    fn test_error_records_survive_overflow() {
        let gate = Gate::new();
        let metrics = Arc::new(BridgeMetrics::new());
        let sink = Arc::new(
            AsyncSink::with_config(
                gate.sink(),
                1,
                OverflowPolicy::DropNewest,
                None,
                Arc::clone(&metrics),
            )
            .unwrap(),
        );
        gate.park_worker(&sink);
        sink.emit(&LogRecord::new(LogLevel::Debug, "queued")).unwrap();
        assert!(sink.emit(&LogRecord::new(LogLevel::Debug, "dropped")).is_err());

        // the synchronous fallback waits on the gate, so emit from another thread
        let producer = {
            let sink = Arc::clone(&sink);
            thread::spawn(move || sink.emit(&LogRecord::new(LogLevel::Error, "critical")))
        };
        while metrics.critical_preserved() == 0 {
            thread::sleep(Duration::from_millis(1));
        }
        gate.release();

        assert!(producer.join().unwrap().is_ok());
        sink.flush().unwrap();

        let messages = gate.memory.messages();
        assert!(messages.contains(&"critical".to_string()));
        assert!(messages.contains(&"queued".to_string()));
        assert!(!messages.contains(&"dropped".to_string()));
    }

    #[test]
    fn test_blocking_error_record_keeps_queue_order() {
        let gate = Gate::new();
        let metrics = Arc::new(BridgeMetrics::new());
        let sink = Arc::new(
            AsyncSink::with_config(
                gate.sink(),
                1,
                OverflowPolicy::Block,
                None,
                Arc::clone(&metrics),
            )
            .unwrap(),
        );
        gate.park_worker(&sink);
        sink.emit(&LogRecord::new(LogLevel::Info, "first")).unwrap();

        let producer = {
            let sink = Arc::clone(&sink);
            thread::spawn(move || sink.emit(&LogRecord::new(LogLevel::Error, "second")))
        };
        while metrics.block_events() == 0 {
            thread::sleep(Duration::from_millis(1));
        }
        gate.release();

        assert!(producer.join().unwrap().is_ok());
        sink.flush().unwrap();

        assert_eq!(
            gate.memory.messages(),
            vec!["parked".to_string(), "first".to_string(), "second".to_string()]
        );
        assert_eq!(metrics.critical_preserved(), 0);
    }

    #[test]
    fn test_alert_callback_invoked_on_first_drop() {
        let gate = Gate::new();
        let alerts = Arc::new(AtomicU64::new(0));
        let alerts_clone = Arc::clone(&alerts);
        let sink = AsyncSink::with_config(
            gate.sink(),
            1,
            OverflowPolicy::AlertAndDrop,
            Some(Arc::new(move |_count| {
                alerts_clone.fetch_add(1, Ordering::Relaxed);
            })),
            Arc::new(BridgeMetrics::new()),
        )
        .unwrap();
        gate.park_worker(&sink);

        for _ in 0..10 {
            let _ = sink.emit(&LogRecord::new(LogLevel::Info, "x"));
        }
        assert_eq!(sink.overflow_drops(), 9);
        assert_eq!(alerts.load(Ordering::Relaxed), 1);

        gate.release();
    }

    #[test]
    fn test_block_with_timeout_gives_up() {
        let gate = Gate::new();
        let metrics = Arc::new(BridgeMetrics::new());
        let sink = AsyncSink::with_config(
            gate.sink(),
            1,
            OverflowPolicy::BlockWithTimeout(Duration::from_millis(20)),
            None,
            Arc::clone(&metrics),
        )
        .unwrap();
        gate.park_worker(&sink);

        let mut refused = 0;
        for _ in 0..5 {
            if sink.emit(&LogRecord::new(LogLevel::Info, "x")).is_err() {
                refused += 1;
            }
        }
        assert_eq!(refused, 4);
        assert_eq!(metrics.block_events(), 4);

        gate.release();
    }

    #[test]
    fn test_shutdown_closes_queue() {
        let memory = MemorySink::new();
        let sink = AsyncSink::new(Arc::new(memory.clone()), 16).unwrap();
        sink.emit(&LogRecord::new(LogLevel::Warn, "before")).unwrap();

        assert!(sink.shutdown(Duration::from_secs(2)));
        assert_eq!(memory.messages(), vec!["before".to_string()]);
        assert!(matches!(
            sink.emit(&LogRecord::new(LogLevel::Warn, "after")),
            Err(BridgeError::QueueClosed)
        ));
        // flushing a closed sink flushes the inner one directly
        assert!(sink.flush().is_ok());
        assert!(sink.shutdown(Duration::from_secs(1)));
    }

    #[test]
    fn test_panicking_inner_sink_keeps_worker_alive() {
        struct Flaky(MemorySink);

        impl LogSink for Flaky {
            fn emit(&self, record: &LogRecord) -> Result<()> {
                if record.message == "boom" {
                    panic!("flaky sink");
                }
                self.0.emit(record)
            }

            fn name(&self) -> &str {
                "flaky"
            }
        }

        let memory = MemorySink::new();
        let metrics = Arc::new(BridgeMetrics::new());
        let sink = AsyncSink::with_config(
            Arc::new(Flaky(memory.clone())),
            16,
            OverflowPolicy::Block,
            None,
            Arc::clone(&metrics),
        )
        .unwrap();

        sink.emit(&LogRecord::new(LogLevel::Info, "boom")).unwrap();
        sink.emit(&LogRecord::new(LogLevel::Info, "after")).unwrap();
        sink.flush().unwrap();

        assert_eq!(memory.messages(), vec!["after".to_string()]);
        assert_eq!(metrics.panics(), 1);
        assert_eq!(metrics.sink_failures(), 1);
    }
}
