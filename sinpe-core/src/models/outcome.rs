//! Transaction outcome types.
//!
//! A transaction is one outbound SMS and the wait for its reply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::phone::NormalizedNumber;

// ============================================================================
// Pending Transaction
// ============================================================================

/// The request currently waiting for a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    /// Provider number the reply is expected from, normalized.
    pub destination: NormalizedNumber,
    /// Text that was sent.
    pub outbound_text: String,
    /// When the transaction started.
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Transaction Outcome
// ============================================================================

/// Final result of one transaction attempt. Exactly one per attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum TransactionOutcome {
    /// A matching reply arrived; carries the reply body.
    Delivered(String),
    /// No matching reply before the deadline.
    TimedOut,
    /// SMS permissions were not granted.
    PermissionDenied,
    /// The SMS transport is not available on this host.
    TransportUnavailable,
    /// The caller cancelled, or a newer transaction superseded this one.
    Cancelled,
    /// Registration or transmission failed.
    Failed(String),
}

impl TransactionOutcome {
    /// Returns the outcome kind without payload.
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Delivered(_) => OutcomeKind::Delivered,
            Self::TimedOut => OutcomeKind::TimedOut,
            Self::PermissionDenied => OutcomeKind::PermissionDenied,
            Self::TransportUnavailable => OutcomeKind::TransportUnavailable,
            Self::Cancelled => OutcomeKind::Cancelled,
            Self::Failed(_) => OutcomeKind::Failed,
        }
    }

    /// Returns the reply body for delivered outcomes.
    pub fn reply(&self) -> Option<&str> {
        match self {
            Self::Delivered(body) => Some(body),
            _ => None,
        }
    }

    /// Returns true for a delivered reply.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}

impl fmt::Display for TransactionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivered(body) => write!(f, "Delivered: {body}"),
            Self::Failed(reason) => write!(f, "Failed: {reason}"),
            other => write!(f, "{}", other.kind()),
        }
    }
}

// ============================================================================
// Outcome Kind
// ============================================================================

/// Outcome discriminant, used for history records and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Reply received.
    Delivered,
    /// Deadline elapsed.
    TimedOut,
    /// Permissions missing.
    PermissionDenied,
    /// Transport missing.
    TransportUnavailable,
    /// Cancelled or superseded.
    Cancelled,
    /// Transport error.
    Failed,
}

impl OutcomeKind {
    /// Returns a short machine-friendly name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::TimedOut => "timed_out",
            Self::PermissionDenied => "permission_denied",
            Self::TransportUnavailable => "transport_unavailable",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }

    /// Returns true if the user may simply submit again.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_reply() {
        let delivered = TransactionOutcome::Delivered("Ha pasado".to_string());
        assert_eq!(delivered.kind(), OutcomeKind::Delivered);
        assert_eq!(delivered.reply(), Some("Ha pasado"));
        assert!(delivered.is_delivered());

        assert_eq!(TransactionOutcome::TimedOut.reply(), None);
        assert_eq!(
            TransactionOutcome::Failed("boom".into()).kind(),
            OutcomeKind::Failed
        );
    }

    #[test]
    fn test_retryable() {
        assert!(OutcomeKind::TimedOut.is_retryable());
        assert!(OutcomeKind::Failed.is_retryable());
        assert!(OutcomeKind::PermissionDenied.is_retryable());
        assert!(!OutcomeKind::Cancelled.is_retryable());
    }

    #[test]
    fn test_display() {
        assert_eq!(TransactionOutcome::TimedOut.to_string(), "timed_out");
        assert_eq!(
            TransactionOutcome::Failed("no signal".into()).to_string(),
            "Failed: no signal"
        );
    }
}
