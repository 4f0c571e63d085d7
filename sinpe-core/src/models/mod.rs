//! Domain models for Sinpe.
//!
//! ## Submodules
//!
//! - [`provider`] - Providers (institutions reached over SMS)
//! - [`contact`] - Transfer destinations
//! - [`receipt`] - Fields recovered from provider replies
//! - [`outcome`] - Transaction outcomes and the pending transaction
//! - [`transfer`] - User-visible transfer states

mod contact;
mod outcome;
mod provider;
mod receipt;
mod transfer;

pub use contact::{Contact, ContactKind};
pub use outcome::{OutcomeKind, PendingTransaction, TransactionOutcome};
pub use provider::Provider;
pub use receipt::Receipt;
pub use transfer::{FailureKind, TransferFailure, TransferState, TransferSuccess};
#[cfg(test)]
mod serde_tests;
