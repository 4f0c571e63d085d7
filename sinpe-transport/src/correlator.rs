//! Transaction correlation.
//!
//! One transaction is: register an inbound listener, send the outbound SMS,
//! then wait for the first inbound message whose sender matches the
//! counterpart. The correlator allows at most one transaction in flight;
//! starting a new one retires the previous listener and resolves the earlier
//! call as [`TransactionOutcome::Cancelled`].

use chrono::Utc;
use sinpe_core::{PendingTransaction, TransactionOutcome, normalize, numbers_match};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, info, instrument, trace, warn};

use crate::context::{DEFAULT_REPLY_TIMEOUT, TransportContext};
use crate::host::{InboundFacility, InboundFilter, ListenerHandle};
use crate::transport::{Capability, PermissionGate, SmsTransport};

// ============================================================================
// Request
// ============================================================================

/// One outbound message and how long to wait for its reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    /// Outbound text.
    pub message: String,
    /// Raw counterpart number. Sent to as is; replies are matched on its
    /// normalized form.
    pub counterpart: String,
    /// Reply deadline, measured from listener registration.
    pub timeout: Duration,
}

impl TransactionRequest {
    /// Creates a request with the default timeout.
    pub fn new(counterpart: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            counterpart: counterpart.into(),
            timeout: DEFAULT_REPLY_TIMEOUT,
        }
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// Listener Slot
// ============================================================================

/// A registered listener, unregistered at most once.
struct ListenerSlot {
    inbound: Arc<dyn InboundFacility>,
    handle: ListenerHandle,
    released: AtomicBool,
}

impl ListenerSlot {
    /// Unregisters the listener. Returns false if already released.
    fn release(&self) -> bool {
        if self.released.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.inbound.unregister(self.handle);
        true
    }
}

impl Drop for ListenerSlot {
    fn drop(&mut self) {
        self.release();
    }
}

/// The in-flight transaction.
struct Active {
    slot: Arc<ListenerSlot>,
    retire_tx: oneshot::Sender<()>,
    pending: PendingTransaction,
}

impl Active {
    fn retire(self) {
        debug!(handle = %self.slot.handle, "Retiring active listener");
        // Signal before releasing: the waiter must see the retire once its
        // event stream closes. It may already be gone.
        let _ = self.retire_tx.send(());
        self.slot.release();
    }
}

/// Clears the active slot and releases the listener however the wait ends,
/// including when the future is dropped.
struct WaitGuard<'a> {
    active: &'a Mutex<Option<Active>>,
    slot: Arc<ListenerSlot>,
}

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        self.slot.release();
        let mut active = lock(self.active);
        if active
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(&current.slot, &self.slot))
        {
            *active = None;
        }
    }
}

fn lock(active: &Mutex<Option<Active>>) -> MutexGuard<'_, Option<Active>> {
    active.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Correlator
// ============================================================================

/// Sends an SMS and resolves with the matching reply.
pub struct TransactionCorrelator {
    transport: Arc<dyn SmsTransport>,
    permissions: Arc<dyn PermissionGate>,
    inbound: Arc<dyn InboundFacility>,
    active: Mutex<Option<Active>>,
}

impl TransactionCorrelator {
    /// Creates a correlator over explicit collaborators.
    pub fn new(
        transport: Arc<dyn SmsTransport>,
        permissions: Arc<dyn PermissionGate>,
        inbound: Arc<dyn InboundFacility>,
    ) -> Self {
        Self {
            transport,
            permissions,
            inbound,
            active: Mutex::new(None),
        }
    }

    /// Creates a correlator from a transport context.
    pub fn from_context(ctx: &TransportContext) -> Self {
        Self::new(
            Arc::clone(&ctx.transport),
            Arc::clone(&ctx.permissions),
            Arc::clone(&ctx.inbound) as Arc<dyn InboundFacility>,
        )
    }

    /// Runs one transaction.
    pub async fn send(&self, request: TransactionRequest) -> TransactionOutcome {
        self.run(request, None).await
    }

    /// Runs one transaction, signalling `transmitted` once the outbound SMS
    /// has been handed to the transport.
    pub async fn send_notify(
        &self,
        request: TransactionRequest,
        transmitted: oneshot::Sender<()>,
    ) -> TransactionOutcome {
        self.run(request, Some(transmitted)).await
    }

    /// Cancels the in-flight transaction. Returns false if there was none.
    pub fn cancel(&self) -> bool {
        let previous = lock(&self.active).take();
        match previous {
            Some(active) => {
                info!(destination = %active.pending.destination, "Cancelling transaction");
                active.retire();
                true
            }
            None => false,
        }
    }

    /// The in-flight transaction, if any.
    pub fn pending(&self) -> Option<PendingTransaction> {
        lock(&self.active).as_ref().map(|active| active.pending.clone())
    }

    async fn preconditions(&self) -> Option<TransactionOutcome> {
        for capability in Capability::REQUIRED {
            if !self.permissions.check_and_request(capability).await.is_granted() {
                warn!(?capability, "SMS permission denied");
                return Some(TransactionOutcome::PermissionDenied);
            }
        }
        if !self.transport.is_available().await {
            warn!(transport = self.transport.name(), "SMS transport unavailable");
            return Some(TransactionOutcome::TransportUnavailable);
        }
        None
    }

    #[instrument(
        skip(self, request, transmitted),
        fields(counterpart = %request.counterpart, timeout = ?request.timeout)
    )]
    async fn run(
        &self,
        request: TransactionRequest,
        transmitted: Option<oneshot::Sender<()>>,
    ) -> TransactionOutcome {
        if let Some(outcome) = self.preconditions().await {
            return outcome;
        }

        // A new transaction always supersedes the previous one.
        let previous = lock(&self.active).take();
        if let Some(previous) = previous {
            previous.retire();
        }

        let expected = normalize(&request.counterpart);

        let subscription = match self.inbound.register(InboundFilter::Any) {
            Ok(subscription) => subscription,
            Err(e) => {
                warn!(error = %e, "Could not register inbound listener");
                return TransactionOutcome::Failed(e.to_string());
            }
        };
        let deadline = Instant::now() + request.timeout;

        let slot = Arc::new(ListenerSlot {
            inbound: Arc::clone(&self.inbound),
            handle: subscription.handle,
            released: AtomicBool::new(false),
        });
        let (retire_tx, mut retire_rx) = oneshot::channel();
        let pending = PendingTransaction {
            destination: expected.clone(),
            outbound_text: request.message.clone(),
            created_at: Utc::now(),
        };

        let raced = lock(&self.active).replace(Active {
            slot: Arc::clone(&slot),
            retire_tx,
            pending,
        });
        if let Some(raced) = raced {
            raced.retire();
        }
        let _guard = WaitGuard {
            active: &self.active,
            slot,
        };

        debug!(expected = %expected, handle = %subscription.handle, "Listening for reply");

        if let Err(e) = self
            .transport
            .send_text(&request.counterpart, &request.message)
            .await
        {
            warn!(error = %e, "Outbound SMS failed");
            return TransactionOutcome::Failed(e.to_string());
        }
        info!(transport = self.transport.name(), "Outbound SMS sent");
        if let Some(transmitted) = transmitted {
            let _ = transmitted.send(());
        }

        let mut events = subscription.events;
        let sleep = tokio::time::sleep_until(deadline);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                biased;

                _ = &mut retire_rx => {
                    debug!("Transaction superseded or cancelled");
                    return TransactionOutcome::Cancelled;
                }
                event = events.recv() => match event {
                    Some(sms) if numbers_match(sms.sender.as_deref(), Some(&expected)) => {
                        info!(sender = ?sms.sender, "Matched reply");
                        return TransactionOutcome::Delivered(sms.body);
                    }
                    Some(sms) => {
                        trace!(sender = ?sms.sender, "Ignoring unrelated SMS");
                    }
                    None if retire_rx.try_recv().is_ok() => {
                        debug!("Transaction superseded or cancelled");
                        return TransactionOutcome::Cancelled;
                    }
                    None => {
                        warn!("Inbound stream closed while waiting");
                        return TransactionOutcome::Failed("inbound listener closed".to_string());
                    }
                },
                () = &mut sleep => {
                    warn!("No reply before deadline");
                    return TransactionOutcome::TimedOut;
                }
            }
        }
    }
}

impl std::fmt::Debug for TransactionCorrelator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionCorrelator")
            .field("transport", &self.transport.name())
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
