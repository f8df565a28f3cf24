//! Sink emitting `tracing` events

use crate::core::{LogLevel, LogRecord, LogSink, Result};

/// Target of every event coming from the JVM, e.g. for `RUST_LOG=slf4j=info`.
pub const TARGET: &str = "slf4j";

// `tracing` needs the level as a constant at the callsite.
macro_rules! emit_at {
    ($level:expr, $record:expr) => {
        match $record.logger.as_deref() {
            Some(logger) => {
                tracing::event!(target: TARGET, $level, logger = logger, "{}", $record.message)
            }
            None => tracing::event!(target: TARGET, $level, "{}", $record.message),
        }
    };
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for TracingSink {
    fn emit(&self, record: &LogRecord) -> Result<()> {
        match record.level {
            LogLevel::Error => emit_at!(tracing::Level::ERROR, record),
            LogLevel::Warn => emit_at!(tracing::Level::WARN, record),
            LogLevel::Info => emit_at!(tracing::Level::INFO, record),
            LogLevel::Debug => emit_at!(tracing::Level::DEBUG, record),
            LogLevel::Trace => emit_at!(tracing::Level::TRACE, record),
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "tracing"
    }
}
