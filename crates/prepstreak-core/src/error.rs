//! Core error types for prepstreak-core.
//!
//! The reconciliation path itself is infallible by design: a missing
//! payload degrades to an empty outcome, a missing profile to a no-op.
//! Errors here cover the surfaces that can genuinely fail -- configuration
//! loading, day-key parsing, and payload (de)serialization.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for prepstreak-core.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Calendar-date errors
    #[error("Date error: {0}")]
    Date(#[from] DateError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Calendar-date errors.
#[derive(Error, Debug)]
pub enum DateError {
    /// A day key did not match the canonical `yyyy-MM-dd` form.
    #[error("Invalid day key '{0}': expected yyyy-MM-dd")]
    InvalidDayKey(String),
}

/// Result type alias for EngineError
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
