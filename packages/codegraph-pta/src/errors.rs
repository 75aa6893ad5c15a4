//! Error types for codegraph-pta
//!
//! Every failure here is fatal for the current run: the solver is a pure
//! fixpoint computation and never retries.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for pointer analysis operations
#[derive(Debug, Error)]
pub enum PtaError {
    /// Configuration rejected before solving started
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A field reference does not resolve to any declared field
    #[error("Unresolved field '{name}' referenced from class '{class}'")]
    UnresolvedField { class: String, name: String },

    /// Structurally invalid program (dangling ids, arity mismatch, ...)
    #[error("Malformed IR: {0}")]
    MalformedIr(String),

    /// Internal invariant of the solver was broken (programming error)
    #[error("Internal invariant violated: {0}")]
    Invariant(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PtaError {
    /// Create a malformed-IR error
    pub fn malformed(msg: impl Into<String>) -> Self {
        PtaError::MalformedIr(msg.into())
    }

    /// Create an invariant-violation error
    pub fn invariant(msg: impl Into<String>) -> Self {
        PtaError::Invariant(msg.into())
    }
}

/// Result type alias for pointer analysis operations
pub type Result<T> = std::result::Result<T, PtaError>;
