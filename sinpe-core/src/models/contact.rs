//! Contact types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a contact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    /// Imported from the device address book.
    #[default]
    #[serde(alias = "contact")]
    Device,
    /// Saved locally by the user.
    Local,
}

/// A transfer destination.
///
/// `number` is the 8-digit local form used in the outbound command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
    /// Origin of the contact.
    #[serde(rename = "type", default)]
    pub kind: ContactKind,
    /// Display name.
    pub name: String,
    /// Local phone number.
    pub number: String,
}

impl Contact {
    /// Creates a device contact.
    pub fn device(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            kind: ContactKind::Device,
            name: name.into(),
            number: number.into(),
        }
    }

    /// Creates a locally saved contact.
    pub fn local(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            kind: ContactKind::Local,
            name: name.into(),
            number: number.into(),
        }
    }

    /// Returns true if `query` appears in the name or number (case-insensitive).
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return false;
        }
        self.name.to_lowercase().contains(&query) || self.number.to_lowercase().contains(&query)
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.number)
    }
}
