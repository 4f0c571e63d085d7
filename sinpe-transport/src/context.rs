//! Transport context bundling the host collaborators.
//!
//! The context is what a correlator is built from: the transport that sends,
//! the permission gate, the inbound hub, and timing settings.

use std::sync::Arc;
use std::time::Duration;

use crate::host::{GrantAll, InboundHub, LoopbackTransport};
use crate::transport::{PermissionGate, SmsTransport};

/// Default time to wait for a provider reply.
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(120);

// ============================================================================
// Transport Settings
// ============================================================================

/// Timing settings for transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSettings {
    /// How long to wait for a reply.
    pub reply_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
        }
    }
}

impl TransportSettings {
    /// Sets the reply timeout.
    #[must_use]
    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = timeout;
        self
    }
}

// ============================================================================
// Transport Context
// ============================================================================

/// Host collaborators for the correlator.
pub struct TransportContext {
    /// Outbound transport.
    pub transport: Arc<dyn SmsTransport>,
    /// Permission gate.
    pub permissions: Arc<dyn PermissionGate>,
    /// Inbound message hub.
    pub inbound: Arc<InboundHub>,
    /// Timing settings.
    pub settings: TransportSettings,
}

impl TransportContext {
    /// Creates a builder.
    pub fn builder() -> TransportContextBuilder {
        TransportContextBuilder::new()
    }

    /// Returns the reply timeout.
    pub fn reply_timeout(&self) -> Duration {
        self.settings.reply_timeout
    }
}

impl std::fmt::Debug for TransportContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportContext")
            .field("transport", &self.transport.name())
            .field("inbound", &self.inbound)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Transport Context Builder
// ============================================================================

/// Builder for [`TransportContext`].
///
/// Unset collaborators default to a fresh hub, [`GrantAll`], and a
/// [`LoopbackTransport`] wired to that hub.
#[derive(Default)]
pub struct TransportContextBuilder {
    transport: Option<Arc<dyn SmsTransport>>,
    permissions: Option<Arc<dyn PermissionGate>>,
    inbound: Option<Arc<InboundHub>>,
    settings: TransportSettings,
}

impl TransportContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the outbound transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn SmsTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the permission gate.
    #[must_use]
    pub fn permissions(mut self, permissions: Arc<dyn PermissionGate>) -> Self {
        self.permissions = Some(permissions);
        self
    }

    /// Sets the inbound hub.
    #[must_use]
    pub fn inbound(mut self, inbound: Arc<InboundHub>) -> Self {
        self.inbound = Some(inbound);
        self
    }

    /// Sets all timing settings.
    #[must_use]
    pub fn settings(mut self, settings: TransportSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the reply timeout.
    #[must_use]
    pub fn reply_timeout(mut self, timeout: Duration) -> Self {
        self.settings.reply_timeout = timeout;
        self
    }

    /// Builds the context.
    pub fn build(self) -> TransportContext {
        let inbound = self.inbound.unwrap_or_default();
        let transport = self.transport.unwrap_or_else(|| {
            Arc::new(LoopbackTransport::with_hub(Arc::clone(&inbound))) as Arc<dyn SmsTransport>
        });
        TransportContext {
            transport,
            permissions: self.permissions.unwrap_or_else(|| Arc::new(GrantAll)),
            inbound,
            settings: self.settings,
        }
    }
}
