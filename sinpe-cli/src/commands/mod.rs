//! CLI command implementations.

pub mod config;
pub mod contacts;
pub mod history;
pub mod normalize;
pub mod parse;
pub mod providers;
pub mod send;
