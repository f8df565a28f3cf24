//! Named loggers and the factory producing them
//!
//! This is the Rust counterpart of `TracingSlf4jLoggerFactory`: every call to
//! [`LoggerFactory::get_logger`] builds a new [`Logger`], and every logging
//! method goes through the same dispatcher the native method uses.

use super::{
    dispatcher::{self, DispatchOutcome, Dispatcher},
    log_level::LogLevel,
};
use std::fmt;
use std::sync::Arc;

pub trait LoggerFactory {
    fn get_logger(&self, name: &str) -> Logger;
}

/// Factory handing out loggers bound to a dispatcher.
///
/// # Example
/// ```
/// use tracing_slf4j::prelude::*;
/// use std::sync::Arc;
///
/// let sink = MemorySink::new();
/// let dispatcher = Arc::new(Dispatcher::builder().sink(sink.clone()).build().unwrap());
/// let factory = TracingLoggerFactory::with_dispatcher(dispatcher);
///
/// let logger = factory.get_logger("com.example.Main");
/// logger.info("started");
/// assert_eq!(sink.records()[0].logger.as_deref(), Some("com.example.Main"));
/// ```
#[derive(Clone, Default)]
pub struct TracingLoggerFactory {
    dispatcher: Option<Arc<Dispatcher>>,
}

impl TracingLoggerFactory {
    /// Loggers from this factory use the global dispatcher.
    pub fn new() -> Self {
        Self { dispatcher: None }
    }

    pub fn with_dispatcher(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher: Some(dispatcher),
        }
    }
}

impl LoggerFactory for TracingLoggerFactory {
    fn get_logger(&self, name: &str) -> Logger {
        let dispatcher = match &self.dispatcher {
            Some(dispatcher) => Arc::clone(dispatcher),
            None => Arc::clone(dispatcher::global()),
        };
        Logger::new(name, dispatcher)
    }
}

pub struct Logger {
    name: String,
    dispatcher: Arc<Dispatcher>,
}

impl Logger {
    pub fn new(name: impl Into<String>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            name: name.into(),
            dispatcher,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.dispatcher.is_enabled(level)
    }

    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) -> DispatchOutcome {
        self.dispatcher
            .log(level, Some(&self.name), message.as_ref())
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn trace(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Trace, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("max_level", &self.dispatcher.max_level())
            .field("sink", &self.dispatcher.sink_name())
            .finish()
    }
}
