//! SMS history.
//!
//! Every transaction attempt is logged with its outbound text and how it
//! resolved. The log is bounded; the oldest entries fall off first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sinpe_core::{OutcomeKind, Provider, TransactionOutcome};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::persistence::{default_history_path, load_json, save_json};

/// Maximum number of history entries kept.
pub const MAX_HISTORY_ENTRIES: usize = 1000;

/// A single transaction attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the attempt resolved.
    pub timestamp: DateTime<Utc>,
    /// Provider label at the time of sending.
    pub provider_label: String,
    /// Number the SMS went to.
    pub provider_number: String,
    /// Text that was sent.
    pub outbound_text: String,
    /// How the attempt resolved.
    pub outcome: OutcomeKind,
    /// Reply body, for delivered outcomes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

impl HistoryEntry {
    /// Builds an entry for an attempt that just resolved.
    pub fn new(provider: &Provider, outbound_text: &str, outcome: &TransactionOutcome) -> Self {
        Self {
            timestamp: Utc::now(),
            provider_label: provider.label.clone(),
            provider_number: provider.value.clone(),
            outbound_text: outbound_text.to_string(),
            outcome: outcome.kind(),
            reply: outcome.reply().map(str::to_string),
        }
    }
}

// ============================================================================
// In-memory log
// ============================================================================

/// Bounded, append-only list of attempts.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SmsHistory {
    entries: VecDeque<HistoryEntry>,
}

impl SmsHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, dropping the oldest past the limit.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > MAX_HISTORY_ENTRIES {
            self.entries.pop_front();
        }
    }

    /// Entries, newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clears all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// ============================================================================
// History Store
// ============================================================================

/// History persisted as a JSON array.
#[derive(Clone)]
pub struct HistoryStore {
    history: Arc<RwLock<SmsHistory>>,
    path: Option<PathBuf>,
}

impl HistoryStore {
    /// Creates an empty, unsaved store.
    pub fn in_memory() -> Self {
        Self {
            history: Arc::new(RwLock::new(SmsHistory::new())),
            path: None,
        }
    }

    /// Loads history from the default path.
    pub async fn load_default() -> Self {
        Self::load(default_history_path()).await
    }

    /// Loads history from `path`; a missing or corrupt file is empty.
    pub async fn load(path: PathBuf) -> Self {
        let history = if path.exists() {
            load_json::<SmsHistory>(&path).await.unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Failed to load history, starting empty");
                SmsHistory::new()
            })
        } else {
            SmsHistory::new()
        };
        Self {
            history: Arc::new(RwLock::new(history)),
            path: Some(path),
        }
    }

    /// Path of the backing file, if persisted.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Appends an entry and saves.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub async fn append(&self, entry: HistoryEntry) -> Result<(), StoreError> {
        debug!(outcome = %entry.outcome, to = %entry.provider_number, "Recording history entry");
        self.history.write().await.record(entry);
        self.save().await
    }

    /// Up to `limit` entries, newest first.
    pub async fn list(&self, limit: Option<usize>) -> Vec<HistoryEntry> {
        let history = self.history.read().await;
        history
            .newest_first()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Number of entries.
    pub async fn len(&self) -> usize {
        self.history.read().await.len()
    }

    /// Removes every entry and saves.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.history.write().await.clear();
        self.save().await
    }

    async fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let snapshot = self.history.read().await.clone();
        save_json(path, &snapshot).await
    }
}
