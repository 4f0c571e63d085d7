// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Sinpe Providers
//!
//! Built-in banks and the parsing of their automated replies.
//!
//! - **Descriptors**: Static records for the banks shipped by default
//! - **Registry**: Lookup by id, name or number
//! - **Markers**: Phrases providers use in confirmations
//! - **Parser**: Receipt extraction and reply classification
//!
//! ## Default Providers
//!
//! | Id | Label | SMS number |
//! |----|-------|------------|
//! | 1 | Promerica | 6223-2450 |
//! | 2 | BAC | 1222 |
//! | 3 | BCR | 2276 |
//! | 4 | BN | 2627 |
//!
//! ## Usage
//!
//! ```ignore
//! use sinpe_providers::{ProviderRegistry, ReplyClass, classify_reply};
//!
//! let bn = ProviderRegistry::get_by_name("BN").unwrap();
//! match classify_reply(reply) {
//!     ReplyClass::Structured(receipt) => println!("{receipt:?}"),
//!     ReplyClass::Plain => println!("{reply}"),
//!     ReplyClass::Rejected => eprintln!("not confirmed"),
//! }
//! ```

pub mod descriptor;
pub mod markers;
pub mod parser;
pub mod registry;

#[cfg(test)]
mod parser_edge_tests;

// Re-export key types
pub use descriptor::ProviderDescriptor;
pub use parser::{ReplyClass, classify_reply, extract, is_confirmation};
pub use registry::ProviderRegistry;
