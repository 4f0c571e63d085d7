//! Provider directory.
//!
//! Providers are kept in insertion order with a persisted selection. The
//! directory never becomes empty: deleting the last provider is refused,
//! and a fresh directory starts with the built-in banks.
//!
//! File shape:
//!
//! ```json
//! { "allProviders": [ { "id": "4", "label": "BN", "value": "2627" } ], "selectedProvider": "4" }
//! ```
//!
//! Older files carried only user-added providers under `customProviders`;
//! those are appended after the defaults once and the file is rewritten.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sinpe_core::{Provider, ProviderDirectory};
use sinpe_providers::ProviderRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_providers_path, load_json, save_json};

// ============================================================================
// File Format
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    all_providers: Option<Vec<Provider>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_providers: Option<Vec<Provider>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_provider: Option<String>,
}

/// In-memory directory state.
#[derive(Debug, Clone)]
struct Directory {
    providers: Vec<Provider>,
    selected: Option<String>,
}

impl Directory {
    fn defaults() -> Self {
        Self {
            providers: ProviderRegistry::defaults(),
            selected: None,
        }
    }

    /// Builds the directory from a file, reporting whether a legacy
    /// migration happened.
    fn from_file(file: ProviderFile) -> (Self, bool) {
        match (file.all_providers, file.custom_providers) {
            (Some(providers), _) if !providers.is_empty() => (
                Self {
                    providers,
                    selected: file.selected_provider,
                },
                false,
            ),
            (_, Some(custom)) => {
                let mut directory = Self::defaults();
                for provider in custom {
                    if directory.find_by_number(&provider.value).is_none() {
                        directory.providers.push(provider);
                    }
                }
                directory.selected = file.selected_provider;
                (directory, true)
            }
            _ => {
                let mut directory = Self::defaults();
                directory.selected = file.selected_provider;
                (directory, false)
            }
        }
    }

    fn to_file(&self) -> ProviderFile {
        ProviderFile {
            all_providers: Some(self.providers.clone()),
            custom_providers: None,
            selected_provider: self.selected.clone(),
        }
    }

    fn find_by_number(&self, raw: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.has_number(raw))
    }

    fn selected(&self) -> Option<&Provider> {
        self.selected
            .as_deref()
            .and_then(|id| self.providers.iter().find(|p| p.id == id))
            .or_else(|| self.providers.first())
    }

    fn next_id(&self) -> String {
        let mut candidate = Utc::now().timestamp_millis();
        while self.providers.iter().any(|p| p.id == candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }
}

// ============================================================================
// Provider Store
// ============================================================================

/// Persistent provider directory with change notifications.
pub struct ProviderStore {
    directory: Arc<RwLock<Directory>>,
    path: Option<PathBuf>,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl ProviderStore {
    /// Creates an unsaved store holding the built-in providers.
    pub fn in_memory() -> Self {
        Self::with_directory(Directory::defaults(), None)
    }

    fn with_directory(directory: Directory, path: Option<PathBuf>) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            directory: Arc::new(RwLock::new(directory)),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Loads the directory from the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if a migrated file cannot be rewritten.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_providers_path()).await
    }

    /// Loads the directory from `path`.
    ///
    /// A missing or corrupt file yields the built-in providers.
    ///
    /// # Errors
    ///
    /// Returns an error if a migrated file cannot be rewritten.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let file = if path.exists() {
            load_json::<ProviderFile>(&path).await.unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Failed to load providers, using defaults");
                ProviderFile::default()
            })
        } else {
            debug!(path = %path.display(), "Providers file not found, using defaults");
            ProviderFile::default()
        };

        let (directory, migrated) = Directory::from_file(file);
        let store = Self::with_directory(directory, Some(path));
        if migrated {
            info!(count = store.list().await.len(), "Migrated legacy custom providers");
            store.save().await?;
        }
        Ok(store)
    }

    /// Path of the backing file, if persisted.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All providers, in insertion order.
    pub async fn list(&self) -> Vec<Provider> {
        self.directory.read().await.providers.clone()
    }

    /// Adds a provider.
    ///
    /// # Errors
    ///
    /// Rejects an empty label or number and a number already present.
    pub async fn add(&self, label: &str, number: &str) -> Result<Provider, StoreError> {
        let label = label.trim();
        let number = number.trim();
        if label.is_empty() || number.is_empty() {
            return Err(StoreError::InvalidProvider(
                "label and number are required".to_string(),
            ));
        }

        let provider = {
            let mut directory = self.directory.write().await;
            if directory.find_by_number(number).is_some() {
                return Err(StoreError::DuplicateProvider(number.to_string()));
            }
            let provider = Provider::new(directory.next_id(), label, number);
            directory.providers.push(provider.clone());
            provider
        };

        info!(id = %provider.id, label = %provider.label, "Added provider");
        self.commit().await?;
        Ok(provider)
    }

    /// Deletes a provider by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LastProvider`] when only one provider remains
    /// and [`StoreError::ProviderNotFound`] for unknown ids.
    pub async fn delete(&self, id: &str) -> Result<Provider, StoreError> {
        let removed = {
            let mut directory = self.directory.write().await;
            if directory.providers.len() <= 1 {
                return Err(StoreError::LastProvider);
            }
            let index = directory
                .providers
                .iter()
                .position(|p| p.id == id)
                .ok_or_else(|| StoreError::ProviderNotFound(id.to_string()))?;
            let removed = directory.providers.remove(index);
            if directory.selected.as_deref() == Some(id) {
                directory.selected = None;
            }
            removed
        };

        info!(id, label = %removed.label, "Deleted provider");
        self.commit().await?;
        Ok(removed)
    }

    /// Restores the built-in providers and clears the selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be saved.
    pub async fn reset(&self) -> Result<(), StoreError> {
        *self.directory.write().await = Directory::defaults();
        info!("Reset providers to defaults");
        self.commit().await
    }

    /// Selects the provider used for transfers.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProviderNotFound`] if no provider matches.
    pub async fn select(&self, query: &str) -> Result<Provider, StoreError> {
        let provider = self
            .find(query)
            .await
            .ok_or_else(|| StoreError::ProviderNotFound(query.to_string()))?;
        self.directory.write().await.selected = Some(provider.id.clone());
        info!(id = %provider.id, label = %provider.label, "Selected provider");
        self.commit().await?;
        Ok(provider)
    }

    /// Finds a provider by id, label (case-insensitive), or number.
    pub async fn find(&self, query: &str) -> Option<Provider> {
        let query = query.trim();
        let directory = self.directory.read().await;
        directory
            .providers
            .iter()
            .find(|p| p.id == query)
            .or_else(|| {
                directory
                    .providers
                    .iter()
                    .find(|p| p.label.eq_ignore_ascii_case(query))
            })
            .or_else(|| directory.find_by_number(query))
            .cloned()
    }

    /// The selected provider, falling back to the first one.
    pub async fn selected_provider(&self) -> Option<Provider> {
        self.directory.read().await.selected().cloned()
    }

    /// Saves the directory, if it has a backing file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub async fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file = self.directory.read().await.to_file();
        save_json(path, &file).await
    }

    /// Subscribes to directory changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    async fn commit(&self) -> Result<(), StoreError> {
        {
            let mut version = self.version.write().await;
            *version += 1;
            let _ = self.notify.send(*version);
        }
        self.save().await
    }
}

impl ProviderDirectory for ProviderStore {
    async fn providers(&self) -> Vec<Provider> {
        self.list().await
    }

    async fn find(&self, id: &str) -> Option<Provider> {
        ProviderStore::find(self, id).await
    }

    async fn selected(&self) -> Option<Provider> {
        self.selected_provider().await
    }
}

// ============================================================================
// Tests
// ============================================================================
