//! Outbound transfer command.
//!
//! Providers parse a single space-delimited line:
//!
//! ```text
//! PASE <amount-digits> <destination-number> <motive>
//! ```

use crate::error::CoreError;
use crate::phone::local_part;

/// Command keyword understood by providers.
pub const TRANSFER_KEYWORD: &str = "PASE";

/// Currency symbol shown in amount inputs.
pub const CURRENCY_SYMBOL: char = '₡';

// ============================================================================
// Amount Helpers
// ============================================================================

/// Keeps only the digits of an amount text ("₡ 5,000" → "5000").
pub fn amount_digits(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Formats raw amount input for display ("5000" → "₡ 5,000").
///
/// Non-digits are discarded and leading zeros dropped. Returns an empty
/// string when no digit is left.
pub fn format_amount(input: &str) -> String {
    let digits = amount_digits(input);
    let trimmed = digits.trim_start_matches('0');
    if digits.is_empty() {
        return String::new();
    }
    let trimmed = if trimmed.is_empty() { "0" } else { trimmed };

    let mut grouped = String::with_capacity(trimmed.len() + trimmed.len() / 3);
    for (i, c) in trimmed.chars().enumerate() {
        if i > 0 && (trimmed.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{CURRENCY_SYMBOL} {grouped}")
}

/// Returns the amount digits, or an error when there are none or they are
/// all zeros.
pub fn validate_amount(text: &str) -> Result<String, CoreError> {
    let amount = amount_digits(text);
    if amount.is_empty() || amount.chars().all(|c| c == '0') {
        return Err(CoreError::InvalidAmount(text.to_string()));
    }
    Ok(amount)
}

/// Returns an error unless `motive` has at least `min` characters after trimming.
pub fn validate_motive(motive: &str, min: usize) -> Result<(), CoreError> {
    if motive.trim().chars().count() < min {
        return Err(CoreError::MotiveTooShort { min });
    }
    Ok(())
}

// ============================================================================
// Transfer Command
// ============================================================================

/// A validated transfer command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCommand {
    amount: String,
    destination: String,
    motive: String,
}

impl TransferCommand {
    /// Builds a command from form values.
    ///
    /// The amount keeps digits only. The destination must be a domestic
    /// number and is reduced to its 8-digit local form.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidAmount`] when the amount has no digits
    /// and [`CoreError::InvalidNumber`] when the destination is not domestic.
    pub fn new(amount_text: &str, destination: &str, motive: &str) -> Result<Self, CoreError> {
        let amount = validate_amount(amount_text)?;

        let destination = local_part(destination)
            .ok_or_else(|| CoreError::InvalidNumber(destination.to_string()))?;

        Ok(Self {
            amount,
            destination,
            motive: motive.trim().to_string(),
        })
    }

    /// Amount digits.
    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Destination in local form.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Motive text.
    pub fn motive(&self) -> &str {
        &self.motive
    }

    /// Renders the SMS body.
    pub fn to_sms_text(&self) -> String {
        format!(
            "{TRANSFER_KEYWORD} {} {} {}",
            self.amount, self.destination, self.motive
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_digits() {
        assert_eq!(amount_digits("₡ 5,000"), "5000");
        assert_eq!(amount_digits("₡1 250 000"), "1250000");
        assert_eq!(amount_digits("abc"), "");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("5000"), "₡ 5,000");
        assert_eq!(format_amount("₡ 5,0001"), "₡ 50,001");
        assert_eq!(format_amount("1234567"), "₡ 1,234,567");
        assert_eq!(format_amount("999"), "₡ 999");
        assert_eq!(format_amount("007"), "₡ 7");
        assert_eq!(format_amount("0"), "₡ 0");
        assert_eq!(format_amount(""), "");
        assert_eq!(format_amount("₡ "), "");
    }

    #[test]
    fn test_compose_command() {
        let cmd = TransferCommand::new("₡ 5,000", "88889999", "pago alquiler").unwrap();
        assert_eq!(cmd.to_sms_text(), "PASE 5000 88889999 pago alquiler");
    }

    #[test]
    fn test_compose_reduces_destination() {
        let cmd = TransferCommand::new("100", "+506 8888-9999", "  cafe ").unwrap();
        assert_eq!(cmd.destination(), "88889999");
        assert_eq!(cmd.to_sms_text(), "PASE 100 88889999 cafe");
    }

    #[test]
    fn test_validate_amount() {
        assert_eq!(validate_amount("₡ 5,000").unwrap(), "5000");
        assert_eq!(validate_amount("0010").unwrap(), "0010");
        assert!(validate_amount("").is_err());
        assert!(validate_amount("₡ 0").is_err());
        assert!(validate_amount("000").is_err());
    }

    #[test]
    fn test_compose_rejects_bad_input() {
        assert!(matches!(
            TransferCommand::new("₡ ", "88889999", "x"),
            Err(CoreError::InvalidAmount(_))
        ));
        assert!(matches!(
            TransferCommand::new("₡ 0", "88889999", "x"),
            Err(CoreError::InvalidAmount(_))
        ));
        assert!(matches!(
            TransferCommand::new("100", "2627", "x"),
            Err(CoreError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_validate_motive() {
        assert!(validate_motive("pago", 1).is_ok());
        assert!(validate_motive("  ", 1).is_err());
        assert!(matches!(
            validate_motive("ab", 3),
            Err(CoreError::MotiveTooShort { min: 3 })
        ));
    }
}
