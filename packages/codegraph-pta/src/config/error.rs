//! Configuration error types

use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Range validation error
    #[error("Invalid range for field '{field}': {value} not in {min}..={max}. {hint}")]
    Range {
        field: String,
        value: String,
        min: String,
        max: String,
        hint: String,
    },

    /// Context sensitivity string could not be parsed
    #[error("Invalid context sensitivity '{spec}': {reason}. Expected 'ci' or '<k>-obj|call|type|hybrid'")]
    InvalidContextSensitivity { spec: String, reason: String },

    /// Unknown worklist discipline
    #[error("Unknown worklist order '{0}'. Valid orders: fifo, lifo")]
    UnknownWorklistOrder(String),

    /// Unknown preset name
    #[error("Unknown preset '{0}'. Valid presets: fast, balanced, precise")]
    UnknownPreset(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Create a range error with a hint
    pub fn range_with_hint(
        field: impl Into<String>,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
        hint: impl Into<String>,
    ) -> Self {
        Self::Range {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
            hint: hint.into(),
        }
    }

    /// Create a context sensitivity parse error
    pub fn invalid_sensitivity(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidContextSensitivity {
            spec: spec.into(),
            reason: reason.into(),
        }
    }
}
