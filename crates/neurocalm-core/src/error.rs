//! Core error types for neurocalm-core.
//!
//! The health-data store itself never fails; the only store-level error is
//! using a handle after its session has ended. Everything else here belongs
//! to the collaborators around it: configuration, profile validation and the
//! external text-generation service.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for neurocalm-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A store handle was used after its owning session ended.
    #[error("health data accessed outside an active session")]
    SessionEnded,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Text-generation errors
    #[error("AI error: {0}")]
    Ai(#[from] AiError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not determine or create the data directory
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Value too short
    #[error("'{field}' must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Value must be strictly positive
    #[error("'{field}' must be positive")]
    NotPositive { field: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors from the external text-generation collaborator.
#[derive(Error, Debug)]
pub enum AiError {
    /// No API key available in the configured environment variable
    #[error("API key not configured: set {env_var}")]
    MissingApiKey { env_var: String },

    /// Transport failure (connect, timeout, TLS)
    #[error("request to text-generation service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("text-generation service error (HTTP {status}): {body}")]
    Status { status: u16, body: String },

    /// Service answered but produced no candidate text
    #[error("text-generation service returned no content")]
    EmptyResponse,

    /// Output did not match the flow's schema
    #[error("output of '{flow}' did not match its schema: {source}")]
    InvalidOutput {
        flow: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
