//! Core error types for Sinpe.

use thiserror::Error;

/// Core error type for Sinpe operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Provider not found in the directory.
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// Amount text carries no digits.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Destination number is not a usable local number.
    #[error("Invalid phone number: {0:?}")]
    InvalidNumber(String),

    /// Motive is shorter than the configured minimum.
    #[error("Motive must have at least {min} characters")]
    MotiveTooShort {
        /// Minimum accepted length.
        min: usize,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
