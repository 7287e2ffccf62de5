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
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Scoring endpoint must use HTTPS in production")]
    ScoringEndpointMustBeHttps,

    #[error("Invalid scoring endpoint URL")]
    InvalidScoringEndpoint,

    #[error("Scoring timeout must be between 1 and 120 seconds")]
    InvalidScoringTimeout,
}
