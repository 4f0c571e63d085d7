//! Store error types.

use sinpe_core::CoreError;
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Provider not found.
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// A provider with the same number already exists.
    #[error("A provider with number {0} already exists")]
    DuplicateProvider(String),

    /// Deleting would leave the directory empty.
    #[error("At least one provider must remain")]
    LastProvider,

    /// Provider label or number missing.
    #[error("Invalid provider: {0}")]
    InvalidProvider(String),

    /// Contact text not in `Name: 88889999` form.
    #[error("Invalid contact: {0}")]
    InvalidContact(String),

    /// A transfer is already in flight.
    #[error("A transfer is already in progress")]
    TransferInProgress,

    /// The form is incomplete.
    #[error("Transfer form incomplete: {0}")]
    IncompleteForm(String),

    /// Validation error from the core crate.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Returns true for errors caused by user input rather than the system.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Serialization(_))
    }
}
