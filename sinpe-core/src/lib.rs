// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Sinpe Core
//!
//! Core types, phone handling, and traits shared by every Sinpe crate.
//!
//! - Phone number normalization and sender matching ([`phone`])
//! - Outbound command composition ([`message`])
//! - Domain models (providers, contacts, receipts, outcomes, transfer states)
//! - Directory traits consumed by the transfer flow
//!
//! ## Key Types
//!
//! ### Correlation
//! - [`NormalizedNumber`] - Canonical phone number
//! - [`PendingTransaction`] - Request awaiting a reply
//! - [`TransactionOutcome`] - Final result of one attempt
//!
//! ### Transfers
//! - [`TransferCommand`] - Validated `PASE` command
//! - [`TransferState`] - Transfer form state
//! - [`Receipt`] - Fields recovered from a reply
//!
//! ### Directories
//! - [`Provider`] / [`ProviderDirectory`]
//! - [`Contact`] / [`ContactDirectory`]

pub mod error;
pub mod message;
pub mod models;
pub mod phone;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export helpers
pub use message::{
    TransferCommand, amount_digits, format_amount, validate_amount, validate_motive,
};
pub use phone::{NormalizedNumber, local_part, normalize, numbers_match};

// Re-export all model types
pub use models::{
    // Directory records
    Contact,
    ContactKind,
    Provider,
    // Correlation
    OutcomeKind,
    PendingTransaction,
    TransactionOutcome,
    // Transfers
    FailureKind,
    Receipt,
    TransferFailure,
    TransferState,
    TransferSuccess,
};

// Re-export traits
pub use traits::{ContactDirectory, ProviderDirectory};
