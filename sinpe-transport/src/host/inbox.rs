//! In-process inbound SMS delivery.
//!
//! [`InboundHub`] fans incoming messages out to registered listeners. Hosts
//! push messages in with [`InboundHub::deliver`] (see [`super::feed`]), and
//! the correlator registers one listener per transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sinpe_core::{NormalizedNumber, numbers_match};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::error::TransportError;

// ============================================================================
// Inbound Message
// ============================================================================

/// A received text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundSms {
    /// Originating address as reported by the carrier, if any.
    pub sender: Option<String>,
    /// Message body.
    pub body: String,
    /// When the host received it.
    pub received_at: DateTime<Utc>,
}

impl InboundSms {
    /// Creates a message received now.
    pub fn new(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender: Some(sender.into()),
            body: body.into(),
            received_at: Utc::now(),
        }
    }

    /// Creates a message whose sender is unknown.
    pub fn anonymous(body: impl Into<String>) -> Self {
        Self {
            sender: None,
            body: body.into(),
            received_at: Utc::now(),
        }
    }
}

// ============================================================================
// Registration Types
// ============================================================================

/// Which messages a listener wants.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InboundFilter {
    /// Every message.
    #[default]
    Any,
    /// Messages whose sender matches this number.
    Sender(NormalizedNumber),
}

impl InboundFilter {
    /// Returns true if `sms` passes the filter.
    pub fn accepts(&self, sms: &InboundSms) -> bool {
        match self {
            Self::Any => true,
            Self::Sender(expected) => numbers_match(sms.sender.as_deref(), Some(expected)),
        }
    }
}

/// Opaque registration handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(u64);

impl fmt::Display for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// A live registration: its handle and the stream of matching messages.
///
/// The stream ends once the handle is unregistered.
#[derive(Debug)]
pub struct Subscription {
    /// Handle to pass to `unregister`.
    pub handle: ListenerHandle,
    /// Messages accepted by the filter.
    pub events: mpsc::UnboundedReceiver<InboundSms>,
}

// ============================================================================
// Inbound Facility
// ============================================================================

/// Register/unregister access to inbound messages.
pub trait InboundFacility: Send + Sync {
    /// Registers a listener.
    ///
    /// # Errors
    ///
    /// Fails when the facility no longer accepts listeners.
    fn register(&self, filter: InboundFilter) -> Result<Subscription, TransportError>;

    /// Removes a listener. Returns false if it was already gone.
    fn unregister(&self, handle: ListenerHandle) -> bool;
}

// ============================================================================
// Inbound Hub
// ============================================================================

struct Listener {
    filter: InboundFilter,
    tx: mpsc::UnboundedSender<InboundSms>,
}

/// Process-wide inbound message broadcaster.
#[derive(Default)]
pub struct InboundHub {
    listeners: Mutex<HashMap<ListenerHandle, Listener>>,
    next_handle: AtomicU64,
    closed: AtomicBool,
}

impl InboundHub {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    fn listeners(&self) -> MutexGuard<'_, HashMap<ListenerHandle, Listener>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Delivers a message to every accepting listener.
    ///
    /// Returns how many listeners received it. Listeners whose receiver was
    /// dropped are pruned.
    pub fn deliver(&self, sms: InboundSms) -> usize {
        let mut listeners = self.listeners();
        let mut delivered = 0;
        listeners.retain(|handle, listener| {
            if !listener.filter.accepts(&sms) {
                return true;
            }
            if listener.tx.send(sms.clone()).is_ok() {
                delivered += 1;
                true
            } else {
                trace!(%handle, "Pruning listener with dropped receiver");
                false
            }
        });
        debug!(
            sender = sms.sender.as_deref().unwrap_or("<unknown>"),
            delivered,
            "Inbound SMS"
        );
        delivered
    }

    /// Number of registered listeners.
    pub fn active_listeners(&self) -> usize {
        self.listeners().len()
    }

    /// Stops accepting new listeners and drops existing ones.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.listeners().clear();
    }

    /// Returns true once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl InboundFacility for InboundHub {
    fn register(&self, filter: InboundFilter) -> Result<Subscription, TransportError> {
        if self.is_closed() {
            return Err(TransportError::InboundClosed);
        }
        let handle = ListenerHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let (tx, events) = mpsc::unbounded_channel();
        self.listeners().insert(handle, Listener { filter, tx });
        debug!(%handle, "Registered inbound listener");
        Ok(Subscription { handle, events })
    }

    fn unregister(&self, handle: ListenerHandle) -> bool {
        let removed = self.listeners().remove(&handle).is_some();
        if removed {
            debug!(%handle, "Unregistered inbound listener");
        }
        removed
    }
}

impl fmt::Debug for InboundHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InboundHub")
            .field("listeners", &self.active_listeners())
            .field("closed", &self.is_closed())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use sinpe_core::normalize;

    #[tokio::test]
    async fn test_register_and_deliver() {
        let hub = InboundHub::new();
        let mut sub = hub.register(InboundFilter::Any).unwrap();

        assert_eq!(hub.deliver(InboundSms::new("2627", "hola")), 1);
        let sms = sub.events.recv().await.unwrap();
        assert_eq!(sms.sender.as_deref(), Some("2627"));
        assert_eq!(sms.body, "hola");
    }

    #[tokio::test]
    async fn test_sender_filter() {
        let hub = InboundHub::new();
        let mut sub = hub
            .register(InboundFilter::Sender(normalize("2276-1234")))
            .unwrap();

        assert_eq!(hub.deliver(InboundSms::new("1222", "otro")), 0);
        assert_eq!(hub.deliver(InboundSms::anonymous("sin remitente")), 0);
        assert_eq!(hub.deliver(InboundSms::new("50622761234", "match")), 1);
        assert_eq!(sub.events.recv().await.unwrap().body, "match");
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        let hub = InboundHub::new();
        let mut sub = hub.register(InboundFilter::Any).unwrap();

        assert!(hub.unregister(sub.handle));
        assert!(!hub.unregister(sub.handle));
        assert_eq!(hub.active_listeners(), 0);
        assert_eq!(hub.deliver(InboundSms::new("2627", "tarde")), 0);
        assert!(sub.events.recv().await.is_none());
    }

    #[test]
    fn test_dropped_receiver_is_pruned() {
        let hub = InboundHub::new();
        let sub = hub.register(InboundFilter::Any).unwrap();
        drop(sub);

        assert_eq!(hub.deliver(InboundSms::new("2627", "x")), 0);
        assert_eq!(hub.active_listeners(), 0);
    }

    #[test]
    fn test_closed_hub_refuses_registration() {
        let hub = InboundHub::new();
        let _sub = hub.register(InboundFilter::Any).unwrap();
        hub.close();

        assert!(hub.is_closed());
        assert_eq!(hub.active_listeners(), 0);
        assert!(matches!(
            hub.register(InboundFilter::Any),
            Err(TransportError::InboundClosed)
        ));
    }

    #[test]
    fn test_handles_are_unique() {
        let hub = InboundHub::new();
        let a = hub.register(InboundFilter::Any).unwrap();
        let b = hub.register(InboundFilter::Any).unwrap();
        assert_ne!(a.handle, b.handle);
        assert_eq!(hub.active_listeners(), 2);
    }
}
