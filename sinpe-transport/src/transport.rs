//! Collaborator traits for sending SMS and checking permissions.
//!
//! The correlator only talks to these traits, so hosts plug in whatever
//! actually moves messages (a modem command, a test loopback).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TransportError;

// ============================================================================
// SMS Transport
// ============================================================================

/// Something that can send a text message.
///
/// ## Implementing a Transport
///
/// ```ignore
/// struct ModemTransport;
///
/// #[async_trait]
/// impl SmsTransport for ModemTransport {
///     fn name(&self) -> &str {
///         "modem"
///     }
///
///     async fn is_available(&self) -> bool {
///         std::path::Path::new("/dev/ttyUSB0").exists()
///     }
///
///     async fn send_text(&self, to: &str, body: &str) -> Result<(), TransportError> {
///         // write AT+CMGS ...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait SmsTransport: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Quick check that sending can work on this host.
    async fn is_available(&self) -> bool;

    /// Sends `body` to the raw number `to`.
    async fn send_text(&self, to: &str, body: &str) -> Result<(), TransportError>;
}

// ============================================================================
// Transport Kind
// ============================================================================

/// Which transport a host is configured to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// External SMS command.
    #[default]
    Command,
    /// In-process loopback, nothing leaves the machine.
    Loopback,
}

impl TransportKind {
    /// Returns the config name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Loopback => "loopback",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransportKind {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "command" => Ok(Self::Command),
            "loopback" => Ok(Self::Loopback),
            other => Err(TransportError::Unavailable(format!("unknown transport {other:?}"))),
        }
    }
}

// ============================================================================
// Permissions
// ============================================================================

/// A runtime capability the correlator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Send outbound messages.
    SendSms,
    /// Be notified of inbound messages.
    ReceiveSms,
    /// Read inbound message bodies.
    ReadSms,
}

impl Capability {
    /// Capabilities required before a transaction may start.
    pub const REQUIRED: [Capability; 3] = [Self::SendSms, Self::ReceiveSms, Self::ReadSms];
}

/// Result of a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    /// Capability available.
    Granted,
    /// Capability refused.
    Denied,
}

impl PermissionStatus {
    /// Returns true if granted.
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

/// Checks (and, where the host supports it, requests) capabilities.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Returns whether `capability` is available, prompting if needed.
    async fn check_and_request(&self, capability: Capability) -> PermissionStatus;
}
