// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Sinpe Store
//!
//! Persistent state for Sinpe.
//!
//! This crate provides:
//!
//! - **ProviderStore**: Provider directory with selection and legacy migration
//! - **ContactStore**: Device and locally saved contacts
//! - **HistoryStore**: Bounded log of every SMS attempt
//! - **SettingsStore**: User preferences with persistence
//! - **TransferMachine**: The transfer form and its state machine
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use sinpe_store::{ProviderStore, TransferConfig, TransferMachine};
//!
//! let providers = Arc::new(ProviderStore::load_default().await?);
//! let machine = TransferMachine::new(correlator, providers, TransferConfig::default());
//!
//! machine.select_counterpart_text("Juan: 88889999")?;
//! machine.set_amount("5000");
//! machine.set_motive("pago alquiler");
//!
//! let mut rx = machine.subscribe();
//! let state = machine.submit().await?;
//! ```

pub mod contact_store;
pub mod error;
pub mod history;
pub mod persistence;
pub mod provider_store;
pub mod settings_store;
pub mod transfer_store;

pub use contact_store::{ContactStore, DeviceEntry, parse_new_contact, unique_numbers};
pub use error::StoreError;
pub use history::{HistoryEntry, HistoryStore, MAX_HISTORY_ENTRIES, SmsHistory};
pub use persistence::{
    default_config_dir, default_contacts_path, default_data_dir, default_history_path,
    default_providers_path, default_settings_path, load_json, load_json_or_default, save_json,
};
pub use provider_store::ProviderStore;
pub use settings_store::{LogLevel, Settings, SettingsStore};
pub use transfer_store::{TransferConfig, TransferForm, TransferMachine, resolve};

#[cfg(test)]
mod persistence_tests;
