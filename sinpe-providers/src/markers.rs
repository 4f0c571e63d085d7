//! Phrases providers use in their automated replies.
//!
//! Matching on these is case-insensitive.

/// Present in every confirmation ("Ha pasado ₡5,000 a ...").
pub const SUCCESS_MARKER: &str = "ha pasado";

/// Introduces the confirmation number.
pub const RECEIPT_MARKER: &str = "comprobante";

/// Words that introduce the destination number ("a", "al").
pub const DESTINATION_PREPOSITIONS: &[&str] = &["a", "al"];

/// Word that introduces the payee name.
pub const PAYEE_PREPOSITION: &str = "de";

/// Currency words that may follow an amount.
pub const CURRENCY_WORDS: &[&str] = &["colones", "dolares", "dólares", "CRC", "USD"];

/// Returns true if `text` contains `marker`, ignoring case.
pub fn contains_marker(text: &str, marker: &str) -> bool {
    text.to_lowercase().contains(&marker.to_lowercase())
}
