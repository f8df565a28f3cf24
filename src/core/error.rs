//! Error types for the bridge

use jni::sys::jint;

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Failure reported by the JNI layer
    #[error("JNI error: {0}")]
    Jni(#[from] jni::errors::Error),

    /// Level code outside the shared constant table
    #[error("Unknown log level code: {code}")]
    UnknownLevel { code: jint },

    /// Level name that does not parse
    #[error("Invalid log level: '{0}'")]
    InvalidLevelName(String),

    /// Java passed `null` as the message
    #[error("Log message is null")]
    NullMessage,

    /// A global dispatcher is already in place
    #[error("A dispatcher is already installed")]
    AlreadyInstalled,

    /// Invalid configuration with details
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfiguration { field: String, message: String },

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Async queue full, record not accepted
    #[error("Log queue full: capacity {capacity}")]
    QueueFull { capacity: usize },

    /// Async queue already shut down
    #[error("Log queue closed")]
    QueueClosed,

    /// Sink-specific failure
    #[error("Sink error: {0}")]
    Sink(String),
}

impl BridgeError {
    /// Create an invalid configuration error
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        BridgeError::InvalidConfiguration {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a sink error
    pub fn sink<S: Into<String>>(msg: S) -> Self {
        BridgeError::Sink(msg.into())
    }
}
