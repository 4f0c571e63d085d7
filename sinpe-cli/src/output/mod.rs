//! Output formatting for CLI.

mod json;
mod text;

pub use json::{JsonFormatter, TransferOutput};
pub use text::TextFormatter;
#[cfg(test)]
mod tests;
