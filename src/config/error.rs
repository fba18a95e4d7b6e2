//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid backend URL format")]
    InvalidBackendUrl,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Polling requires at least one attempt")]
    InvalidMaxAttempts,

    #[error("Polling interval must be greater than zero")]
    InvalidPollInterval,

    #[error("Invalid log filter directive: {0}")]
    InvalidLogLevel(String),
}
