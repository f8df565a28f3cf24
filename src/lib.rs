//! # tracing-slf4j
//!
//! SLF4J backend compatible with Rust's `tracing` crate. Java programs started
//! from your process log through SLF4J, and their events come out of your
//! `tracing` subscriber under the `slf4j` target.
//!
//! ## Usage
//!
//! When using JNI's invocation API, the Java half of the bridge has to be on
//! the classpath. With the `embed-jar` feature the crate carries it:
//!
//! 1. Save the jar (`DEPENDENCIES`, or `write_dependencies`; both need
//!    `embed-jar`) to disk.
//! 2. Add [`classpath_option`] (`-Djava.class.path=<PATH TO JAR>`) to the
//!    JVM's start parameters.
//!
//! After the JVM has been started, register the native method:
//!
//! ```ignore
//! tracing_slf4j::register_log_fn(&mut env)?;
//! ```
//!
//! To filter, escape or decouple the JVM from slow subscribers, use
//! [`bridge::init`] with a [`BridgeConfig`] instead.
//!
//! ## Features
//!
//! - **Five fixed levels**: codes 0..=4 shared with `TracingSlf4jImpl`
//! - **Pluggable sinks**: `tracing` by default, in-memory or queued
//! - **Never throws into Java**: failures become metrics

pub mod bridge;
pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        BridgeConfig, BridgeError, BridgeMetrics, DispatchOutcome, Dispatcher, DispatcherBuilder,
        LogLevel, LogRecord, LogSink, Logger, LoggerFactory, OverflowCallback, OverflowPolicy,
        Result, TracingLoggerFactory,
    };
    pub use crate::sinks::{AsyncSink, MemorySink, TracingSink};
}

pub use bridge::{
    classpath_option, init, register_log_fn, register_with, tracing_slf4j_impl, unregister_log_fn,
};
#[cfg(feature = "embed-jar")]
pub use bridge::{write_dependencies, DEPENDENCIES};
pub use crate::core::{
    BridgeConfig, BridgeError, BridgeMetrics, DispatchOutcome, Dispatcher, DispatcherBuilder,
    LogLevel, LogRecord, LogSink, Logger, LoggerFactory, OverflowCallback, OverflowPolicy,
    Result, TracingLoggerFactory, CLASS_NAME, METHOD_NAME, METHOD_SIGNATURE,
};
pub use sinks::{AsyncSink, MemorySink, TracingSink, DEFAULT_SHUTDOWN_TIMEOUT};
