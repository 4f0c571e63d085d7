//! Transport error types.

use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Transport Error
// ============================================================================

/// Error type for SMS transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No transport on this host.
    #[error("Transport unavailable: {0}")]
    Unavailable(String),

    /// The transport refused or failed to send.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// An inbound listener could not be registered.
    #[error("Listener registration failed: {0}")]
    Registration(String),

    /// The inbound facility was shut down.
    #[error("Inbound facility closed")]
    InboundClosed,

    /// Process error from a command transport.
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Process Error
// ============================================================================

/// Error type for external SMS command execution.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Command not found on `PATH`.
    #[error("Command not found: {0}")]
    NotFound(String),

    /// The command template is unusable.
    #[error("Invalid command template: {0}")]
    InvalidTemplate(String),

    /// Command timed out.
    #[error("Command timed out after {0:?}")]
    Timeout(Duration),

    /// Non-zero exit code.
    #[error("Command exited with code {code}: {stderr}")]
    NonZeroExit {
        /// Exit code from the process.
        code: i32,
        /// Standard error output.
        stderr: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
