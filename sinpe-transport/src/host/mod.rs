//! Host APIs for sending and receiving SMS.
//!
//! - [`inbox`] - Inbound message hub and listener registration
//! - [`feed`] - Line-oriented inbound source (stdin, FIFO)
//! - [`process`] - External SMS command transport
//! - [`loopback`] - Recording in-process transport
//! - [`permission`] - Permission gates

pub mod feed;
pub mod inbox;
pub mod loopback;
pub mod permission;
pub mod process;

// Re-export key types
pub use feed::{LineFeed, parse_line};
pub use inbox::{
    InboundFacility, InboundFilter, InboundHub, InboundSms, ListenerHandle, Subscription,
};
pub use loopback::{LoopbackTransport, ScriptedReply, SentSms};
pub use permission::{GrantAll, StaticPermissions};
pub use process::{CommandTemplate, CommandTransport, DEFAULT_COMMAND};
