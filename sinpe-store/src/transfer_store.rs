//! Transfer state machine.
//!
//! Holds the transfer form (counterpart, amount, motive) and drives one
//! transfer at a time through the correlator:
//!
//! ```text
//! Idle -> Sending -> AwaitingResponse -> Succeeded | Failed
//! ```
//!
//! `Failed` is retryable; a cancelled transaction returns to `Idle` without
//! a message. Observers follow the state through [`TransferMachine::subscribe`].

use chrono::Local;
use sinpe_core::{
    Contact, CoreError, Provider, ProviderDirectory, Receipt, TransactionOutcome, TransferCommand,
    TransferFailure, TransferState, TransferSuccess, format_amount, validate_amount, validate_motive,
};
use sinpe_providers::{ReplyClass, classify_reply};
use sinpe_transport::{DEFAULT_REPLY_TIMEOUT, TransactionCorrelator, TransactionRequest};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, instrument, warn};

use crate::contact_store::parse_new_contact;
use crate::error::StoreError;
use crate::history::{HistoryEntry, HistoryStore};
use crate::settings_store::Settings;

// ============================================================================
// Configuration
// ============================================================================

/// Limits applied to each submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferConfig {
    /// Minimum motive length in characters.
    pub min_motive_len: usize,
    /// How long to wait for the provider reply.
    pub reply_timeout: Duration,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            min_motive_len: 1,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
        }
    }
}

impl From<&Settings> for TransferConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            min_motive_len: settings.min_motive_len,
            reply_timeout: settings.reply_timeout(),
        }
    }
}

// ============================================================================
// Form
// ============================================================================

/// Current form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    /// Selected destination.
    pub counterpart: Option<Contact>,
    /// Amount as displayed (e.g. "₡ 5,000").
    pub amount: String,
    /// Transfer motive.
    pub motive: String,
}

impl TransferForm {
    fn missing(&self, min_motive_len: usize) -> Option<String> {
        if self.counterpart.is_none() {
            return Some("no destination selected".to_string());
        }
        if let Err(e) = validate_amount(&self.amount) {
            return Some(e.to_string());
        }
        validate_motive(&self.motive, min_motive_len)
            .err()
            .map(|e| e.to_string())
    }

    fn command(&self, min_motive_len: usize) -> Result<TransferCommand, StoreError> {
        if let Some(reason) = self.missing(min_motive_len) {
            return Err(StoreError::IncompleteForm(reason));
        }
        let destination = self
            .counterpart
            .as_ref()
            .map(|c| c.number.as_str())
            .unwrap_or_default();
        Ok(TransferCommand::new(&self.amount, destination, &self.motive)?)
    }

    /// Receipt fields known before the reply arrives.
    fn receipt(&self, command: &TransferCommand) -> Receipt {
        Receipt {
            amount_text: Some(self.amount.clone()),
            destination_phone: Some(command.destination().to_string()),
            motive: Some(command.motive().to_string()).filter(|m| !m.is_empty()),
            timestamp: Some(Local::now().naive_local()),
            ..Receipt::default()
        }
    }
}

// ============================================================================
// Machine
// ============================================================================

/// Drives transfers for one form.
pub struct TransferMachine<P> {
    correlator: Arc<TransactionCorrelator>,
    providers: Arc<P>,
    config: TransferConfig,
    history: Option<HistoryStore>,
    form: Mutex<TransferForm>,
    state: watch::Sender<TransferState>,
}

impl<P: ProviderDirectory> TransferMachine<P> {
    /// Creates a machine in `Idle` with an empty form.
    pub fn new(correlator: Arc<TransactionCorrelator>, providers: Arc<P>, config: TransferConfig) -> Self {
        let (state, _) = watch::channel(TransferState::Idle);
        Self {
            correlator,
            providers,
            config,
            history: None,
            form: Mutex::new(TransferForm::default()),
            state,
        }
    }

    /// Records every attempt into `history`.
    #[must_use]
    pub fn with_history(mut self, history: HistoryStore) -> Self {
        self.history = Some(history);
        self
    }

    fn form(&self) -> MutexGuard<'_, TransferForm> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------------
    // Form
    // ------------------------------------------------------------------------

    /// Sets the destination.
    pub fn select_counterpart(&self, contact: Contact) {
        debug!(contact = %contact, "Selected counterpart");
        self.form().counterpart = Some(contact);
    }

    /// Sets the destination from `Name: 88889999` text.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidContact`] if the text does not parse.
    pub fn select_counterpart_text(&self, text: &str) -> Result<Contact, StoreError> {
        let contact = parse_new_contact(text)
            .ok_or_else(|| StoreError::InvalidContact(format!("expected 'Name: 88889999', got {text:?}")))?;
        self.select_counterpart(contact.clone());
        Ok(contact)
    }

    /// Sets the amount, formatted for display. Returns the formatted text.
    pub fn set_amount(&self, input: &str) -> String {
        let formatted = format_amount(input);
        self.form().amount = formatted.clone();
        formatted
    }

    /// Sets the motive.
    pub fn set_motive(&self, motive: &str) {
        self.form().motive = motive.to_string();
    }

    /// Snapshot of the form.
    pub fn form_values(&self) -> TransferForm {
        self.form().clone()
    }

    /// The SMS the current form would send.
    ///
    /// # Errors
    ///
    /// Same validation errors as [`submit`](Self::submit).
    pub fn preview(&self) -> Result<String, StoreError> {
        let command = self.form().command(self.config.min_motive_len)?;
        Ok(command.to_sms_text())
    }

    /// Returns true if the form is complete and nothing is in flight.
    pub fn can_submit(&self) -> bool {
        !self.state.borrow().is_busy() && self.form().missing(self.config.min_motive_len).is_none()
    }

    // ------------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------------

    /// Current state.
    pub fn state(&self) -> TransferState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<TransferState> {
        self.state.subscribe()
    }

    /// Cancels the in-flight transfer. The pending submit returns `Idle`.
    pub fn cancel(&self) -> bool {
        self.correlator.cancel()
    }

    /// Returns to `Idle` and clears the form.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TransferInProgress`] while a transfer is in flight.
    pub fn reset(&self) -> Result<(), StoreError> {
        let mut refused = false;
        self.state.send_if_modified(|state| {
            if state.is_busy() {
                refused = true;
                return false;
            }
            let changed = *state != TransferState::Idle;
            *state = TransferState::Idle;
            changed
        });
        if refused {
            return Err(StoreError::TransferInProgress);
        }
        *self.form() = TransferForm::default();
        debug!("Transfer form reset");
        Ok(())
    }

    fn transition(&self, next: TransferState) {
        debug!(from = %self.state.borrow().as_str(), to = %next.as_str(), "Transfer state");
        self.state.send_replace(next);
    }

    // ------------------------------------------------------------------------
    // Submit
    // ------------------------------------------------------------------------

    /// Sends the transfer and waits for it to resolve.
    ///
    /// Returns the final state: `Succeeded`, `Failed`, or `Idle` if the
    /// transfer was cancelled.
    ///
    /// # Errors
    ///
    /// Validation errors are returned before anything is sent and leave the
    /// state untouched: an incomplete form, an invalid amount or number, no
    /// provider, or a transfer already in flight.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> Result<TransferState, StoreError> {
        if self.state.borrow().is_busy() {
            return Err(StoreError::TransferInProgress);
        }

        let (command, known) = {
            let form = self.form();
            let command = form.command(self.config.min_motive_len)?;
            let known = form.receipt(&command);
            (command, known)
        };

        let provider = self
            .providers
            .selected()
            .await
            .ok_or_else(|| StoreError::Core(CoreError::ProviderNotFound("no provider selected".into())))?;

        let mut started = false;
        self.state.send_if_modified(|state| {
            if state.is_busy() {
                return false;
            }
            *state = TransferState::Sending;
            started = true;
            true
        });
        if !started {
            return Err(StoreError::TransferInProgress);
        }

        let text = command.to_sms_text();
        info!(provider = %provider, "Submitting transfer");
        let outcome = self.transmit(&provider, &text).await;

        let next = resolve(&outcome, known);
        info!(outcome = %outcome.kind(), state = %next, "Transfer resolved");
        self.transition(next.clone());
        self.record(&provider, &text, &outcome).await;
        Ok(next)
    }

    async fn transmit(&self, provider: &Provider, text: &str) -> TransactionOutcome {
        let request = TransactionRequest::new(provider.value.clone(), text)
            .with_timeout(self.config.reply_timeout);
        let (transmitted_tx, transmitted_rx) = oneshot::channel();

        let awaiting = async {
            if transmitted_rx.await.is_ok() {
                self.state.send_if_modified(|state| {
                    if *state != TransferState::Sending {
                        return false;
                    }
                    *state = TransferState::AwaitingResponse;
                    true
                });
            }
        };

        let (outcome, ()) = tokio::join!(self.correlator.send_notify(request, transmitted_tx), awaiting);
        outcome
    }

    async fn record(&self, provider: &Provider, text: &str, outcome: &TransactionOutcome) {
        let Some(history) = &self.history else {
            return;
        };
        if let Err(e) = history.append(HistoryEntry::new(provider, text, outcome)).await {
            warn!(error = %e, "Failed to record history");
        }
    }
}

/// Maps a resolved transaction to the next state.
///
/// `known` holds the form values used to complete a structured receipt.
pub fn resolve(outcome: &TransactionOutcome, known: Receipt) -> TransferState {
    match outcome {
        TransactionOutcome::Delivered(reply) => match classify_reply(reply) {
            ReplyClass::Structured(receipt) => {
                TransferState::Succeeded(TransferSuccess::Receipt(receipt.or(known)))
            }
            ReplyClass::Plain => TransferState::Succeeded(TransferSuccess::Plain(reply.clone())),
            ReplyClass::Rejected => TransferState::Failed(TransferFailure::rejected(reply)),
        },
        other => match TransferFailure::from_outcome(other) {
            Some(failure) => TransferState::Failed(failure),
            None => TransferState::Idle,
        },
    }
}

impl<P> std::fmt::Debug for TransferMachine<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferMachine")
            .field("state", &*self.state.borrow())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
