//! Core error types for tomate-core.
//!
//! The timer state machine itself never fails. These errors describe what can
//! go wrong in the configuration and metrics stores, whose contract methods
//! log and swallow them; the `try_*` variants surface them to callers that
//! want to react (the CLI, tests).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tomate-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session history errors
    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read configuration from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the configuration file
    #[error("Failed to save configuration to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid JSON or does not match the schema
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// One or more values failed validation
    #[error("Invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),

    /// Key passed to `get`/`set` does not exist
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// Value passed to `set` cannot be converted to the field's type
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Session history errors.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to read the metrics file
    #[error("Failed to read metrics from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the metrics file
    #[error("Failed to save metrics to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid JSON or does not match the schema
    #[error("Failed to parse metrics: {0}")]
    Parse(#[from] serde_json::Error),

    /// Session end precedes its start
    #[error("Invalid session: end ({end}) is before start ({start})")]
    InvalidSession {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
