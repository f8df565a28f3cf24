//! Severity levels shared with the Java side
//!
//! The numeric codes are the ones `nl.mrfriendly.tracing.TracingSlf4jImpl`
//! declares; both sides must agree on them.

use super::error::BridgeError;
use jni::sys::jint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ERROR: jint = 0;
pub const WARN: jint = 1;
pub const INFO: jint = 2;
pub const DEBUG: jint = 3;
pub const TRACE: jint = 4;

/// Ordered by increasing verbosity: `Error < Warn < Info < Debug < Trace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    #[default]
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    /// The code passed across the native boundary.
    #[inline]
    pub const fn code(self) -> jint {
        match self {
            LogLevel::Error => ERROR,
            LogLevel::Warn => WARN,
            LogLevel::Info => INFO,
            LogLevel::Debug => DEBUG,
            LogLevel::Trace => TRACE,
        }
    }

    pub fn from_code(code: jint) -> Result<Self, BridgeError> {
        match code {
            ERROR => Ok(LogLevel::Error),
            WARN => Ok(LogLevel::Warn),
            INFO => Ok(LogLevel::Info),
            DEBUG => Ok(LogLevel::Debug),
            TRACE => Ok(LogLevel::Trace),
            _ => Err(BridgeError::UnknownLevel { code }),
        }
    }

    /// Like [`LogLevel::from_code`], but anything unknown is treated as trace.
    #[inline]
    pub fn from_code_lossy(code: jint) -> Self {
        Self::from_code(code).unwrap_or(LogLevel::Trace)
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    pub fn as_tracing(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ERROR" => Ok(LogLevel::Error),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            "TRACE" => Ok(LogLevel::Trace),
            _ => Err(BridgeError::InvalidLevelName(s.to_string())),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        level.as_tracing()
    }
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        if level == tracing::Level::ERROR {
            LogLevel::Error
        } else if level == tracing::Level::WARN {
            LogLevel::Warn
        } else if level == tracing::Level::INFO {
            LogLevel::Info
        } else if level == tracing::Level::DEBUG {
            LogLevel::Debug
        } else {
            LogLevel::Trace
        }
    }
}

impl TryFrom<jint> for LogLevel {
    type Error = BridgeError;

    fn try_from(code: jint) -> Result<Self, BridgeError> {
        Self::from_code(code)
    }
}
