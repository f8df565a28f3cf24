//! Routing of level codes and messages into a sink

use super::{
    config::BridgeConfig,
    error::{BridgeError, Result},
    log_level::LogLevel,
    log_record::LogRecord,
    metrics::BridgeMetrics,
    overflow_policy::{OverflowCallback, OverflowPolicy},
    sink::LogSink,
};
use crate::sinks::{AsyncSink, TracingSink};
use jni::sys::jint;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Arc<Dispatcher>> = OnceLock::new();

/// What happened to a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Handed to the sink (or its queue)
    Emitted,
    /// More verbose than the configured maximum level
    Filtered,
    /// The sink failed or refused the record
    Dropped,
}

pub struct Dispatcher {
    max_level: LogLevel,
    escape_control_chars: bool,
    sink: Arc<dyn LogSink>,
    metrics: Arc<BridgeMetrics>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            max_level: LogLevel::Trace,
            escape_control_chars: false,
            sink,
            metrics: Arc::new(BridgeMetrics::new()),
        }
    }

    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Build a dispatcher writing to `tracing` with the given settings.
    pub fn from_config(config: &BridgeConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Self::builder()
            .max_level(config.max_level)
            .escape_control_chars(config.escape_control_chars);
        if let Some(capacity) = config.async_buffer {
            builder = builder
                .async_mode(capacity)
                .overflow_policy(config.overflow_policy.clone());
        }
        builder.build()
    }

    pub fn max_level(&self) -> LogLevel {
        self.max_level
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level <= self.max_level
    }

    pub fn sink_name(&self) -> &str {
        self.sink.name()
    }

    pub fn metrics(&self) -> &BridgeMetrics {
        &self.metrics
    }

    /// Entry point for raw calls from the JVM. Unknown codes are logged at
    /// trace level.
    pub fn dispatch(&self, code: jint, message: &str) -> DispatchOutcome {
        let level = match LogLevel::from_code(code) {
            Ok(level) => level,
            Err(_) => {
                self.metrics.record_unknown_level();
                LogLevel::Trace
            }
        };
        self.log(level, None, message)
    }

    pub fn log(&self, level: LogLevel, logger: Option<&str>, message: &str) -> DispatchOutcome {
        if !self.is_enabled(level) {
            self.metrics.record_filtered();
            return DispatchOutcome::Filtered;
        }

        let message = if self.escape_control_chars {
            LogRecord::escape_control_chars(message)
        } else {
            message.to_string()
        };

        let mut record = LogRecord::new(level, message);
        if let Some(logger) = logger {
            record = record.with_logger(logger);
        }
        self.emit(&record)
    }

    /// Count a call whose message could not be read.
    pub fn reject(&self, error: &BridgeError) {
        let previous = self.metrics.record_rejected();
        if previous == 0 || (previous + 1).is_multiple_of(1000) {
            eprintln!(
                "[TRACING-SLF4J WARNING] Discarded log call from the JVM: {} ({} so far)",
                error,
                previous + 1
            );
        }
    }

    /// Count a panic caught outside the sink.
    pub fn record_panic(&self) {
        self.metrics.record_panic();
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.flush()
    }

    /// The sink is isolated with `catch_unwind` so a panicking subscriber
    /// cannot unwind into the JVM.
    fn emit(&self, record: &LogRecord) -> DispatchOutcome {
        let result =
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| self.sink.emit(record)));

        match result {
            Ok(Ok(())) => {
                self.metrics.record_dispatched();
                DispatchOutcome::Emitted
            }
            Ok(Err(e)) => {
                let previous = self.metrics.record_dropped();
                if previous == 0 || (previous + 1).is_multiple_of(1000) {
                    eprintln!(
                        "[TRACING-SLF4J ERROR] Sink '{}' failed: {} ({} dropped so far)",
                        self.sink.name(),
                        e,
                        previous + 1
                    );
                }
                DispatchOutcome::Dropped
            }
            Err(panic_info) => {
                self.metrics.record_panic();
                self.metrics.record_dropped();
                eprintln!(
                    "[TRACING-SLF4J CRITICAL] Sink '{}' panicked: {}",
                    self.sink.name(),
                    panic_message(panic_info.as_ref())
                );
                DispatchOutcome::Dropped
            }
        }
    }
}

impl Default for Dispatcher {
    /// Synchronous dispatch of every level into `tracing`.
    fn default() -> Self {
        Self::new(Arc::new(TracingSink::new()))
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Install the dispatcher used by the native method.
///
/// Fails with [`BridgeError::AlreadyInstalled`] if one was installed before,
/// including the default one [`global`] creates on first use.
pub fn install(dispatcher: Dispatcher) -> Result<Arc<Dispatcher>> {
    let dispatcher = Arc::new(dispatcher);
    GLOBAL
        .set(Arc::clone(&dispatcher))
        .map_err(|_| BridgeError::AlreadyInstalled)?;
    Ok(dispatcher)
}

/// The dispatcher used by the native method, creating the default one if
/// nothing was installed.
pub fn global() -> &'static Arc<Dispatcher> {
    GLOBAL.get_or_init(|| Arc::new(Dispatcher::default()))
}

pub fn is_installed() -> bool {
    GLOBAL.get().is_some()
}

/// Builder for [`Dispatcher`]
///
/// # Example
/// ```
/// use tracing_slf4j::prelude::*;
///
/// let sink = MemorySink::new();
/// let dispatcher = Dispatcher::builder()
///     .max_level(LogLevel::Info)
///     .sink(sink.clone())
///     .build()
///     .unwrap();
///
/// dispatcher.dispatch(tracing_slf4j::core::log_level::INFO, "hello");
/// dispatcher.dispatch(tracing_slf4j::core::log_level::DEBUG, "hidden");
/// assert_eq!(sink.messages(), vec!["hello".to_string()]);
/// ```
pub struct DispatcherBuilder {
    max_level: LogLevel,
    escape_control_chars: bool,
    sink: Option<Arc<dyn LogSink>>,
    async_buffer: Option<usize>,
    overflow_policy: Option<OverflowPolicy>,
    on_overflow: Option<OverflowCallback>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            max_level: LogLevel::Trace,
            escape_control_chars: false,
            sink: None,
            async_buffer: None,
            overflow_policy: None,
            on_overflow: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_level(mut self, level: LogLevel) -> Self {
        self.max_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn escape_control_chars(mut self, escape: bool) -> Self {
        self.escape_control_chars = escape;
        self
    }

    /// Replace the default [`TracingSink`]
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: LogSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn shared_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Put a bounded queue and a worker thread in front of the sink.
    #[must_use = "builder methods return a new value"]
    pub fn async_mode(mut self, capacity: usize) -> Self {
        self.async_buffer = Some(capacity);
        self
    }

    /// Requires [`DispatcherBuilder::async_mode`]; `build` fails without it.
    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = Some(policy);
        self
    }

    /// Requires [`DispatcherBuilder::async_mode`]; `build` fails without it.
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    pub fn build(self) -> Result<Dispatcher> {
        if self.async_buffer.is_none() {
            if self.overflow_policy.is_some() {
                return Err(BridgeError::config(
                    "overflow_policy",
                    "only applies with an async buffer",
                ));
            }
            if self.on_overflow.is_some() {
                return Err(BridgeError::config(
                    "on_overflow",
                    "only applies with an async buffer",
                ));
            }
        }

        let metrics = Arc::new(BridgeMetrics::new());
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(TracingSink::new()) as Arc<dyn LogSink>);

        let sink: Arc<dyn LogSink> = match self.async_buffer {
            Some(0) => {
                return Err(BridgeError::config("async_buffer", "must be greater than zero"));
            }
            Some(capacity) => Arc::new(AsyncSink::with_config(
                sink,
                capacity,
                self.overflow_policy.unwrap_or_default(),
                self.on_overflow,
                Arc::clone(&metrics),
            )?),
            None => sink,
        };

        Ok(Dispatcher {
            max_level: self.max_level,
            escape_control_chars: self.escape_control_chars,
            sink,
            metrics,
        })
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
