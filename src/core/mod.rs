//! Core bridge types and traits

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod overflow_policy;
pub mod sink;

pub use config::{BridgeConfig, CLASS_NAME, METHOD_NAME, METHOD_SIGNATURE};
pub use dispatcher::{DispatchOutcome, Dispatcher, DispatcherBuilder};
pub use error::{BridgeError, Result};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use logger::{Logger, LoggerFactory, TracingLoggerFactory};
pub use metrics::BridgeMetrics;
pub use overflow_policy::{OverflowCallback, OverflowPolicy};
pub use sink::LogSink;
