//! Registry of built-in providers.
//!
//! These are the providers a fresh directory starts with and the ones a
//! reset restores.

use sinpe_core::{Provider, normalize};

use crate::descriptor::{BAC, BCR, BN, PROMERICA, ProviderDescriptor};

/// Built-in providers in display order.
static DESCRIPTORS: [ProviderDescriptor; 4] = [PROMERICA, BAC, BCR, BN];

/// Static access to the built-in providers.
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Returns all built-in descriptors.
    pub fn all() -> &'static [ProviderDescriptor] {
        &DESCRIPTORS
    }

    /// Default directory contents.
    pub fn defaults() -> Vec<Provider> {
        Self::all().iter().map(ProviderDescriptor::to_provider).collect()
    }

    /// Looks up a descriptor by id.
    pub fn get(id: &str) -> Option<&'static ProviderDescriptor> {
        Self::all().iter().find(|d| d.id == id)
    }

    /// Looks up a descriptor by label or alias.
    pub fn get_by_name(name: &str) -> Option<&'static ProviderDescriptor> {
        Self::all().iter().find(|d| d.answers_to(name))
    }

    /// Looks up a descriptor by SMS number, in any format.
    pub fn get_by_number(raw: &str) -> Option<&'static ProviderDescriptor> {
        let wanted = normalize(raw);
        Self::all().iter().find(|d| d.normalized_number() == wanted)
    }

    /// Returns the number of built-in providers.
    pub fn count() -> usize {
        Self::all().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_order_and_ids() {
        let defaults = ProviderRegistry::defaults();
        let labels: Vec<&str> = defaults.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["Promerica", "BAC", "BCR", "BN"]);
        let ids: Vec<&str> = defaults.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4"]);
    }

    #[test]
    fn test_lookups() {
        assert_eq!(ProviderRegistry::get("4").map(|d| d.label), Some("BN"));
        assert_eq!(ProviderRegistry::get_by_name("banco nacional").map(|d| d.id), Some("4"));
        assert_eq!(ProviderRegistry::get_by_number("62232450").map(|d| d.id), Some("1"));
        assert_eq!(ProviderRegistry::get_by_number("+506 6223 2450").map(|d| d.id), Some("1"));
        assert!(ProviderRegistry::get("9").is_none());
        assert_eq!(ProviderRegistry::count(), 4);
    }

    #[test]
    fn test_numbers_are_unique() {
        let all = ProviderRegistry::all();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.normalized_number(), b.normalized_number());
            }
        }
    }
}
