//! Bridge configuration
//!
//! Everything here has a default, so an empty JSON object is a valid
//! configuration that reproduces [`crate::register_log_fn`].

use super::error::{BridgeError, Result};
use super::log_level::LogLevel;
use super::overflow_policy::OverflowPolicy;
use serde::{Deserialize, Serialize};

/// Java class declaring the native method.
pub const CLASS_NAME: &str = "nl/mrfriendly/tracing/TracingSlf4jImpl";

/// Name of the native method on [`CLASS_NAME`].
pub const METHOD_NAME: &str = "tracingSlf4jImpl";

/// JNI signature of the native method: `(int level, String message) -> void`.
pub const METHOD_SIGNATURE: &str = "(ILjava/lang/String;)V";

/// Environment variable overriding [`BridgeConfig::max_level`].
pub const MAX_LEVEL_ENV: &str = "TRACING_SLF4J_MAX_LEVEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Binary name of the class whose native method gets registered
    pub class_name: String,
    pub method_name: String,
    /// Most verbose level forwarded to the sink
    pub max_level: LogLevel,
    pub escape_control_chars: bool,
    /// Queue capacity; `None` dispatches on the calling JVM thread
    pub async_buffer: Option<usize>,
    pub overflow_policy: OverflowPolicy,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            class_name: CLASS_NAME.to_string(),
            method_name: METHOD_NAME.to_string(),
            max_level: LogLevel::Trace,
            escape_control_chars: false,
            async_buffer: None,
            overflow_policy: OverflowPolicy::default(),
        }
    }
}

impl BridgeConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        let level = std::env::var(MAX_LEVEL_ENV).ok();
        self.with_max_level_override(level.as_deref())
    }

    fn with_max_level_override(mut self, value: Option<&str>) -> Result<Self> {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.max_level = value
                .parse()
                .map_err(|_| BridgeError::config(MAX_LEVEL_ENV, format!("unknown level '{}'", value)))?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.class_name.trim().is_empty() {
            return Err(BridgeError::config("class_name", "must not be empty"));
        }
        if self.class_name.contains('.') {
            return Err(BridgeError::config(
                "class_name",
                format!("'{}' must use '/' as package separator", self.class_name),
            ));
        }
        if self.method_name.trim().is_empty() {
            return Err(BridgeError::config("method_name", "must not be empty"));
        }
        if self.async_buffer == Some(0) {
            return Err(BridgeError::config("async_buffer", "must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.class_name, CLASS_NAME);
        assert_eq!(config.method_name, METHOD_NAME);
        assert_eq!(config.max_level, LogLevel::Trace);
        assert!(config.async_buffer.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = BridgeConfig::from_json("{}").unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn test_full_json() {
        let config = BridgeConfig::from_json(
            r#"{
                "class_name": "com/example/NativeLog",
                "method_name": "log",
                "max_level": "info",
                "escape_control_chars": true,
                "async_buffer": 1024,
                "overflow_policy": { "BlockWithTimeout": { "secs": 1, "nanos": 0 } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.class_name, "com/example/NativeLog");
        assert_eq!(config.max_level, LogLevel::Info);
        assert!(config.escape_control_chars);
        assert_eq!(config.async_buffer, Some(1024));
        assert_eq!(
            config.overflow_policy,
            OverflowPolicy::BlockWithTimeout(Duration::from_secs(1))
        );
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(matches!(
            BridgeConfig::from_json(r#"{"level": "info"}"#),
            Err(BridgeError::Json(_))
        ));
    }

    #[test]
    fn test_validation() {
        let err = BridgeConfig::from_json(r#"{"async_buffer": 0}"#).unwrap_err();
        assert!(err.to_string().contains("async_buffer"));

        let err = BridgeConfig::from_json(r#"{"class_name": "nl.mrfriendly.Foo"}"#).unwrap_err();
        assert!(err.to_string().contains("class_name"));
    }

    #[test]
    fn test_max_level_override() {
        let config = BridgeConfig::default()
            .with_max_level_override(Some("warn"))
            .unwrap();
        assert_eq!(config.max_level, LogLevel::Warn);

        let config = BridgeConfig::default().with_max_level_override(Some("  ")).unwrap();
        assert_eq!(config.max_level, LogLevel::Trace);

        let err = BridgeConfig::default()
            .with_max_level_override(Some("loud"))
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidConfiguration { .. }));
    }
}
