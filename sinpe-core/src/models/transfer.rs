//! Transfer state types.
//!
//! These are the user-visible states of one transfer, driven by the
//! transfer state machine in the store crate.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::outcome::TransactionOutcome;
use crate::models::receipt::Receipt;

// ============================================================================
// Transfer State
// ============================================================================

/// State of the transfer form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum TransferState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// Outbound SMS being handed to the transport.
    Sending,
    /// Outbound SMS sent, waiting for the provider reply.
    AwaitingResponse,
    /// The provider confirmed the transfer.
    Succeeded(TransferSuccess),
    /// The attempt failed; submitting again is allowed.
    Failed(TransferFailure),
}

impl TransferState {
    /// Returns true while a transaction is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Sending | Self::AwaitingResponse)
    }

    /// Returns true for `Succeeded` and `Failed`.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    /// Returns a short state name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Sending => "SENDING",
            Self::AwaitingResponse => "AWAITING_RESPONSE",
            Self::Succeeded(_) => "SUCCEEDED",
            Self::Failed(_) => "FAILED",
        }
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Success
// ============================================================================

/// What a successful transfer shows the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TransferSuccess {
    /// Structured receipt (reference id and payee recovered).
    Receipt(Receipt),
    /// Reply text only.
    Plain(String),
}

impl TransferSuccess {
    /// Returns the receipt, if structured.
    pub fn receipt(&self) -> Option<&Receipt> {
        match self {
            Self::Receipt(receipt) => Some(receipt),
            Self::Plain(_) => None,
        }
    }
}

// ============================================================================
// Failure
// ============================================================================

/// Why an attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No reply before the deadline.
    TimedOut,
    /// SMS permissions missing.
    PermissionDenied,
    /// No SMS transport on this host.
    TransportUnavailable,
    /// Transport error while sending.
    Transport,
    /// The provider replied without confirming the transfer.
    Rejected,
}

/// A failed attempt with a message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFailure {
    /// Failure category.
    pub kind: FailureKind,
    /// Human-readable reason.
    pub reason: String,
}

impl TransferFailure {
    /// Maps a non-delivered outcome to a failure.
    ///
    /// Returns `None` for `Delivered` (classified separately) and for
    /// `Cancelled`, which is not reported to the user.
    pub fn from_outcome(outcome: &TransactionOutcome) -> Option<Self> {
        let (kind, reason) = match outcome {
            TransactionOutcome::Delivered(_) | TransactionOutcome::Cancelled => return None,
            TransactionOutcome::TimedOut => (
                FailureKind::TimedOut,
                "The provider did not reply in time".to_string(),
            ),
            TransactionOutcome::PermissionDenied => (
                FailureKind::PermissionDenied,
                "SMS permissions are required to send transfers".to_string(),
            ),
            TransactionOutcome::TransportUnavailable => (
                FailureKind::TransportUnavailable,
                "SMS is not available on this device".to_string(),
            ),
            TransactionOutcome::Failed(reason) => (
                FailureKind::Transport,
                format!("Could not send the SMS: {reason}"),
            ),
        };
        Some(Self { kind, reason })
    }

    /// Failure for a reply that does not confirm the transfer.
    pub fn rejected(reply: &str) -> Self {
        Self {
            kind: FailureKind::Rejected,
            reason: format!("The provider did not confirm the transfer: {}", reply.trim()),
        }
    }
}

impl fmt::Display for TransferFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}
