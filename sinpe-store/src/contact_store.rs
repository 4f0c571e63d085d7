//! Contact directory.
//!
//! Two sources feed it: entries imported from the device address book and
//! contacts the user saved locally. Device entries can carry several
//! numbers; each unique number becomes its own contact.

use regex::Regex;
use serde::{Deserialize, Serialize};
use sinpe_core::phone::COUNTRY_CODE;
use sinpe_core::{Contact, ContactDirectory, ContactKind, local_part};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_contacts_path, load_json, save_json};

/// Ad-hoc contact typed as `Name: 88889999`.
static NEW_CONTACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:]+?)\s*:\s*(\d{8})$").expect("Invalid regex"));

// ============================================================================
// Number Helpers
// ============================================================================

/// Strips whitespace and the `+506` prefix from each number and drops
/// duplicates, keeping first-seen order.
pub fn unique_numbers<'a, I>(numbers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = format!("+{COUNTRY_CODE}");
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for raw in numbers {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        let stripped = compact.strip_prefix(&prefix).unwrap_or(&compact).to_string();
        if !stripped.is_empty() && seen.insert(stripped.clone()) {
            out.push(stripped);
        }
    }
    out
}

/// Parses an ad-hoc `Name: 88889999` entry.
///
/// Returns `None` unless the text is a non-empty name, a colon, and exactly
/// eight digits.
pub fn parse_new_contact(text: &str) -> Option<Contact> {
    let caps = NEW_CONTACT.captures(text.trim())?;
    let name = caps.get(1)?.as_str().trim();
    let number = caps.get(2)?.as_str();
    (!name.is_empty()).then(|| Contact::local(name, number))
}

// ============================================================================
// Device Import
// ============================================================================

/// One address-book entry as exported from the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEntry {
    /// Display name.
    pub name: String,
    /// Phone numbers in whatever format the address book holds.
    #[serde(default)]
    pub numbers: Vec<String>,
}

impl DeviceEntry {
    /// Expands the entry into one device contact per unique number.
    pub fn into_contacts(self) -> Vec<Contact> {
        let name = self.name.trim().to_string();
        unique_numbers(self.numbers.iter().map(String::as_str))
            .into_iter()
            .map(|number| Contact::device(name.clone(), number))
            .collect()
    }
}

// ============================================================================
// Contact Store
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ContactFile {
    #[serde(default)]
    device: Vec<Contact>,
    #[serde(default)]
    local: Vec<Contact>,
}

/// Persistent contact directory.
pub struct ContactStore {
    contacts: Arc<RwLock<ContactFile>>,
    path: Option<PathBuf>,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl ContactStore {
    /// Creates an empty, unsaved store.
    pub fn in_memory() -> Self {
        Self::with_file(ContactFile::default(), None)
    }

    fn with_file(file: ContactFile, path: Option<PathBuf>) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            contacts: Arc::new(RwLock::new(file)),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Loads contacts from the default path.
    pub async fn load_default() -> Self {
        Self::load(default_contacts_path()).await
    }

    /// Loads contacts from `path`; a missing or corrupt file is empty.
    pub async fn load(path: PathBuf) -> Self {
        let file = if path.exists() {
            load_json::<ContactFile>(&path).await.unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Failed to load contacts, starting empty");
                ContactFile::default()
            })
        } else {
            debug!(path = %path.display(), "Contacts file not found");
            ContactFile::default()
        };
        Self::with_file(file, Some(path))
    }

    /// Path of the backing file, if persisted.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Device contacts followed by local ones.
    pub async fn list(&self) -> Vec<Contact> {
        let file = self.contacts.read().await;
        file.device.iter().chain(file.local.iter()).cloned().collect()
    }

    /// Contacts of one kind.
    pub async fn list_kind(&self, kind: ContactKind) -> Vec<Contact> {
        let file = self.contacts.read().await;
        match kind {
            ContactKind::Device => file.device.clone(),
            ContactKind::Local => file.local.clone(),
        }
    }

    /// Replaces the device contacts with the expansion of `entries`.
    ///
    /// Returns the number of contacts imported.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub async fn import_device(&self, entries: Vec<DeviceEntry>) -> Result<usize, StoreError> {
        let device: Vec<Contact> = entries
            .into_iter()
            .flat_map(DeviceEntry::into_contacts)
            .collect();
        let count = device.len();
        self.contacts.write().await.device = device;
        info!(count, "Imported device contacts");
        self.commit().await?;
        Ok(count)
    }

    /// Saves a local contact.
    ///
    /// The number is reduced to its 8-digit local form. Saving a contact
    /// that already exists with the same name and number is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidContact`] for an empty name or a number
    /// that is not domestic.
    pub async fn add_local(&self, name: &str, number: &str) -> Result<Contact, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidContact("name is required".to_string()));
        }
        let number = local_part(number)
            .ok_or_else(|| StoreError::InvalidContact(format!("not a local number: {number}")))?;
        let contact = Contact::local(name, number);

        {
            let mut file = self.contacts.write().await;
            if file.local.contains(&contact) {
                debug!(contact = %contact, "Local contact already saved");
                return Ok(contact);
            }
            file.local.push(contact.clone());
        }

        info!(contact = %contact, "Saved local contact");
        self.commit().await?;
        Ok(contact)
    }

    /// Saves a contact parsed from `Name: 88889999` text.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidContact`] if the text does not parse.
    pub async fn add_from_text(&self, text: &str) -> Result<Contact, StoreError> {
        let parsed = parse_new_contact(text)
            .ok_or_else(|| StoreError::InvalidContact(format!("expected 'Name: 88889999', got {text:?}")))?;
        self.add_local(&parsed.name, &parsed.number).await
    }

    /// Saves the store, if it has a backing file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub async fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file = self.contacts.read().await.clone();
        save_json(path, &file).await
    }

    /// Subscribes to contact changes.
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

impl ContactDirectory for ContactStore {
    async fn contacts(&self) -> Vec<Contact> {
        self.list().await
    }
}

// ============================================================================
// Tests
// ============================================================================
