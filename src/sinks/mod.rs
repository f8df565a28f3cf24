//! Sink implementations

pub mod async_sink;
pub mod memory;
pub mod tracing_sink;

pub use async_sink::{AsyncSink, DEFAULT_FLUSH_TIMEOUT, DEFAULT_SHUTDOWN_TIMEOUT};
pub use memory::MemorySink;
pub use tracing_sink::{TracingSink, TARGET};

pub use crate::core::LogSink;
