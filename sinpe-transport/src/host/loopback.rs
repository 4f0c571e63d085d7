//! In-process transport that never leaves the machine.
//!
//! Every send is recorded. A scripted reply can be queued so the next send
//! is answered through the [`InboundHub`], which lets the whole transfer
//! flow run without a modem.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

use super::inbox::{InboundHub, InboundSms};
use crate::error::TransportError;
use crate::transport::SmsTransport;

/// A message handed to the loopback transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    /// Raw destination.
    pub to: String,
    /// Body.
    pub body: String,
    /// When it was sent.
    pub sent_at: DateTime<Utc>,
}

/// A reply delivered after the next send.
#[derive(Debug, Clone)]
pub struct ScriptedReply {
    /// Sender to report. `None` answers from the number that was sent to.
    pub from: Option<String>,
    /// Reply body.
    pub body: String,
    /// Delay before delivery.
    pub delay: Duration,
}

impl ScriptedReply {
    /// Reply from the destination after `delay`.
    pub fn new(body: impl Into<String>, delay: Duration) -> Self {
        Self {
            from: None,
            body: body.into(),
            delay,
        }
    }

    /// Overrides the reported sender.
    #[must_use]
    pub fn from(mut self, sender: impl Into<String>) -> Self {
        self.from = Some(sender.into());
        self
    }
}

#[derive(Debug, Default)]
struct LoopbackState {
    sent: Vec<SentSms>,
    reply: Option<ScriptedReply>,
    failure: Option<String>,
}

/// Recording transport with optional scripted replies.
#[derive(Debug)]
pub struct LoopbackTransport {
    hub: Option<Arc<InboundHub>>,
    available: AtomicBool,
    state: Mutex<LoopbackState>,
}

impl LoopbackTransport {
    /// Creates a transport that only records.
    pub fn new() -> Self {
        Self {
            hub: None,
            available: AtomicBool::new(true),
            state: Mutex::new(LoopbackState::default()),
        }
    }

    /// Creates a transport that can answer through `hub`.
    pub fn with_hub(hub: Arc<InboundHub>) -> Self {
        Self {
            hub: Some(hub),
            ..Self::new()
        }
    }

    fn state(&self) -> MutexGuard<'_, LoopbackState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues a reply for the next send.
    pub fn script_reply(&self, reply: ScriptedReply) {
        self.state().reply = Some(reply);
    }

    /// Makes the next send fail with `reason`.
    pub fn fail_next(&self, reason: impl Into<String>) {
        self.state().failure = Some(reason.into());
    }

    /// Toggles availability.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Messages sent so far.
    pub fn sent(&self) -> Vec<SentSms> {
        self.state().sent.clone()
    }

    /// The most recent message.
    pub fn last_sent(&self) -> Option<SentSms> {
        self.state().sent.last().cloned()
    }
}

impl Default for LoopbackTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsTransport for LoopbackTransport {
    fn name(&self) -> &str {
        "loopback"
    }

    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn send_text(&self, to: &str, body: &str) -> Result<(), TransportError> {
        let reply = {
            let mut state = self.state();
            if let Some(reason) = state.failure.take() {
                return Err(TransportError::SendFailed(reason));
            }
            state.sent.push(SentSms {
                to: to.to_string(),
                body: body.to_string(),
                sent_at: Utc::now(),
            });
            state.reply.take()
        };
        debug!(to, body, "Loopback send");

        if let (Some(reply), Some(hub)) = (reply, self.hub.clone()) {
            let sender = reply.from.unwrap_or_else(|| to.to_string());
            tokio::spawn(async move {
                tokio::time::sleep(reply.delay).await;
                hub.deliver(InboundSms::new(sender, reply.body));
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::inbox::{InboundFacility, InboundFilter};

    #[tokio::test]
    async fn test_records_sends() {
        let transport = LoopbackTransport::new();
        transport.send_text("2627", "PASE 1 88889999 a").await.unwrap();
        transport.send_text("1222", "PASE 2 88889999 b").await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(transport.last_sent().unwrap().to, "1222");
    }

    #[tokio::test]
    async fn test_scripted_reply_uses_destination() {
        let hub = Arc::new(InboundHub::new());
        let mut sub = hub.register(InboundFilter::Any).unwrap();
        let transport = LoopbackTransport::with_hub(Arc::clone(&hub));

        transport.script_reply(ScriptedReply::new("Ha pasado", Duration::from_millis(5)));
        transport.send_text("2627", "PASE").await.unwrap();

        let sms = sub.events.recv().await.unwrap();
        assert_eq!(sms.sender.as_deref(), Some("2627"));
        assert_eq!(sms.body, "Ha pasado");
    }

    #[tokio::test]
    async fn test_reply_is_consumed() {
        let hub = Arc::new(InboundHub::new());
        let transport = LoopbackTransport::with_hub(Arc::clone(&hub));
        transport.script_reply(ScriptedReply::new("uno", Duration::ZERO).from("9999"));
        transport.send_text("2627", "a").await.unwrap();
        assert!(transport.state().reply.is_none());
    }

    #[tokio::test]
    async fn test_fail_next_and_availability() {
        let transport = LoopbackTransport::new();
        transport.fail_next("no signal");
        assert!(matches!(
            transport.send_text("2627", "x").await,
            Err(TransportError::SendFailed(_))
        ));
        assert!(transport.sent().is_empty());
        assert!(transport.send_text("2627", "x").await.is_ok());

        transport.set_available(false);
        assert!(!transport.is_available().await);
    }
}
