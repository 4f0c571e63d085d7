//! Trait definitions for Sinpe.
//!
//! Directories are read-only views the transfer flow consumes. Stores in
//! `sinpe-store` implement them on top of persisted JSON.

use crate::models::{Contact, Provider};

/// Read access to the configured providers.
pub trait ProviderDirectory: Send + Sync {
    /// Returns every provider, in display order.
    fn providers(&self) -> impl std::future::Future<Output = Vec<Provider>> + Send;

    /// Looks up a provider by its id.
    fn find(&self, id: &str) -> impl std::future::Future<Output = Option<Provider>> + Send {
        async move {
            self.providers()
                .await
                .into_iter()
                .find(|provider| provider.id == id)
        }
    }

    /// Returns the provider currently selected for transfers, if any.
    fn selected(&self) -> impl std::future::Future<Output = Option<Provider>> + Send;
}

/// Read access to transfer destinations.
pub trait ContactDirectory: Send + Sync {
    /// Returns every contact. Device contacts come before local ones.
    fn contacts(&self) -> impl std::future::Future<Output = Vec<Contact>> + Send;

    /// Returns contacts whose name or number contains `query`.
    ///
    /// An empty query returns nothing.
    fn search(&self, query: &str) -> impl std::future::Future<Output = Vec<Contact>> + Send {
        async move {
            self.contacts()
                .await
                .into_iter()
                .filter(|contact| contact.matches_query(query))
                .collect()
        }
    }
}
