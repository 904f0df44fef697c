//! Logging configuration.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Accepted values for [`LoggingConfig::level`].
const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Accepted values for [`LoggingConfig::format`].
const FORMATS: &[&str] = &["pretty", "json"];

/// Logging and tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// Log level: `"trace"`, `"debug"`, `"info"`, `"warn"`, `"error"`.
    ///
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_level")]
    #[validate(custom(function = "validate_level"))]
    pub level: String,
    /// Log format: `"pretty"` or `"json"`.
    #[serde(default = "default_format")]
    #[validate(custom(function = "validate_format"))]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl LoggingConfig {
    /// Whether records should be emitted as JSON lines.
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

fn validate_level(level: &str) -> Result<(), ValidationError> {
    if LEVELS.iter().any(|l| l.eq_ignore_ascii_case(level)) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_log_level"))
    }
}

fn validate_format(format: &str) -> Result<(), ValidationError> {
    if FORMATS.iter().any(|f| f.eq_ignore_ascii_case(format)) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_log_format"))
    }
}
