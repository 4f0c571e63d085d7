// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Sinpe Transport
//!
//! SMS transports, inbound delivery, and reply correlation.
//!
//! ## Host APIs
//!
//! The [`host`] module provides the pieces that touch the outside world:
//!
//! - [`host::inbox`] - Inbound hub and listener registration
//! - [`host::feed`] - Line-oriented inbound source
//! - [`host::process`] - External SMS command transport
//! - [`host::loopback`] - Recording in-process transport
//! - [`host::permission`] - Permission gates
//!
//! ## Correlation
//!
//! - [`transport::SmsTransport`] / [`transport::PermissionGate`] - Collaborator traits
//! - [`context::TransportContext`] - Bundles the collaborators
//! - [`correlator::TransactionCorrelator`] - Send one SMS, await its reply
//!
//! ## Example
//!
//! ```ignore
//! use sinpe_transport::{TransactionCorrelator, TransactionRequest, TransportContext};
//!
//! let ctx = TransportContext::builder().build();
//! let correlator = TransactionCorrelator::from_context(&ctx);
//!
//! let outcome = correlator
//!     .send(TransactionRequest::new("2627", "PASE 5000 88889999 pago"))
//!     .await;
//! ```

pub mod context;
pub mod correlator;
pub mod error;
pub mod host;
pub mod transport;

// Errors
pub use error::{ProcessError, TransportError};

// Host APIs
pub use host::{
    CommandTemplate, CommandTransport, DEFAULT_COMMAND, GrantAll, InboundFacility, InboundFilter,
    InboundHub, InboundSms, LineFeed, ListenerHandle, LoopbackTransport, ScriptedReply, SentSms,
    StaticPermissions, Subscription, parse_line,
};

// Correlation
pub use context::{
    DEFAULT_REPLY_TIMEOUT, TransportContext, TransportContextBuilder, TransportSettings,
};
pub use correlator::{TransactionCorrelator, TransactionRequest};
pub use transport::{Capability, PermissionGate, PermissionStatus, SmsTransport, TransportKind};
