//! Provider types.
//!
//! A provider is the financial institution that executes transfers on
//! behalf of the user. It is reached through a fixed SMS number and replies
//! from the same number.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::phone::{NormalizedNumber, normalize};

// ============================================================================
// Provider
// ============================================================================

/// A provider as stored in the provider directory.
///
/// `id` is an opaque directory key. Identity for deduplication is `value`,
/// the raw number the outbound SMS is sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Opaque directory key.
    pub id: String,
    /// Display name (e.g. "BN").
    pub label: String,
    /// Raw destination number for outbound SMS (e.g. "2627").
    pub value: String,
}

impl Provider {
    /// Creates a provider record.
    pub fn new(id: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
        }
    }

    /// Returns the normalized form of the provider number.
    pub fn normalized_number(&self) -> NormalizedNumber {
        normalize(&self.value)
    }

    /// Returns true if this provider is reached through `raw`.
    ///
    /// Comparison is on normalized numbers so "6223-2450" and "62232450"
    /// are the same provider.
    pub fn has_number(&self, raw: &str) -> bool {
        self.normalized_number() == normalize(raw)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_number_ignores_formatting() {
        let provider = Provider::new("1", "Promerica", "6223-2450");
        assert!(provider.has_number("62232450"));
        assert!(provider.has_number("+506 6223 2450"));
        assert!(!provider.has_number("2627"));
    }

    #[test]
    fn test_display() {
        let provider = Provider::new("4", "BN", "2627");
        assert_eq!(provider.to_string(), "BN (2627)");
    }
}
