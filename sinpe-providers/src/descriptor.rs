//! Built-in provider descriptors.
//!
//! A descriptor is the static record of a bank reachable over SMS: its
//! directory id, display label, SMS number, and names users may type for it.

use sinpe_core::{NormalizedNumber, Provider, normalize};

/// Static configuration for a built-in provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// Directory id.
    pub id: &'static str,
    /// Display label.
    pub label: &'static str,
    /// SMS number, as shown to users.
    pub number: &'static str,
    /// Other names accepted when looking the provider up.
    pub aliases: &'static [&'static str],
}

impl ProviderDescriptor {
    /// Converts to a directory record.
    pub fn to_provider(&self) -> Provider {
        Provider::new(self.id, self.label, self.number)
    }

    /// Normalized SMS number.
    pub fn normalized_number(&self) -> NormalizedNumber {
        normalize(self.number)
    }

    /// Returns true if `name` is the label or an alias, ignoring case.
    pub fn answers_to(&self, name: &str) -> bool {
        let name = name.trim();
        self.label.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

/// Banco Promerica.
pub const PROMERICA: ProviderDescriptor = ProviderDescriptor {
    id: "1",
    label: "Promerica",
    number: "6223-2450",
    aliases: &["Banco Promerica"],
};

/// BAC Credomatic.
pub const BAC: ProviderDescriptor = ProviderDescriptor {
    id: "2",
    label: "BAC",
    number: "1222",
    aliases: &["BAC Credomatic"],
};

/// Banco de Costa Rica.
pub const BCR: ProviderDescriptor = ProviderDescriptor {
    id: "3",
    label: "BCR",
    number: "2276",
    aliases: &["Banco de Costa Rica"],
};

/// Banco Nacional.
pub const BN: ProviderDescriptor = ProviderDescriptor {
    id: "4",
    label: "BN",
    number: "2627",
    aliases: &["Banco Nacional"],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_provider() {
        let provider = BN.to_provider();
        assert_eq!(provider, Provider::new("4", "BN", "2627"));
    }

    #[test]
    fn test_answers_to() {
        assert!(BCR.answers_to("bcr"));
        assert!(BCR.answers_to(" Banco de Costa Rica "));
        assert!(!BCR.answers_to("BN"));
    }

    #[test]
    fn test_promerica_number_is_domestic() {
        assert!(PROMERICA.normalized_number().is_domestic());
        assert!(!BAC.normalized_number().is_domestic());
    }
}
