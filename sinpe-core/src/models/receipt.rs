//! Receipt types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Structured fields recovered from a provider reply.
///
/// Every field is optional; extraction degrades field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Amount with its currency word (e.g. "5,000.00 colones").
    pub amount_text: Option<String>,
    /// Destination phone (8-digit local form).
    pub destination_phone: Option<String>,
    /// Name of the account holder on the other side.
    pub payee_name: Option<String>,
    /// Provider confirmation number.
    pub reference_id: Option<String>,
    /// Transfer motive.
    pub motive: Option<String>,
    /// When the transfer happened.
    pub timestamp: Option<NaiveDateTime>,
}

impl Receipt {
    /// Creates an empty receipt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the receipt identifies the transfer well enough to be
    /// shown as a structured receipt.
    pub fn is_structured(&self) -> bool {
        self.reference_id.is_some() && self.payee_name.is_some()
    }

    /// Returns true if no field was recovered.
    pub fn is_empty(&self) -> bool {
        self.amount_text.is_none()
            && self.destination_phone.is_none()
            && self.payee_name.is_none()
            && self.reference_id.is_none()
            && self.motive.is_none()
            && self.timestamp.is_none()
    }

    /// Fills absent fields from `other`, keeping fields already present.
    #[must_use]
    pub fn or(mut self, other: Receipt) -> Self {
        self.amount_text = self.amount_text.or(other.amount_text);
        self.destination_phone = self.destination_phone.or(other.destination_phone);
        self.payee_name = self.payee_name.or(other.payee_name);
        self.reference_id = self.reference_id.or(other.reference_id);
        self.motive = self.motive.or(other.motive);
        self.timestamp = self.timestamp.or(other.timestamp);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_requires_reference_and_payee() {
        let mut receipt = Receipt::new();
        assert!(!receipt.is_structured());
        assert!(receipt.is_empty());

        receipt.reference_id = Some("123456".to_string());
        assert!(!receipt.is_structured());

        receipt.payee_name = Some("Juan Perez".to_string());
        assert!(receipt.is_structured());
    }

    #[test]
    fn test_or_keeps_present_fields() {
        let extracted = Receipt {
            amount_text: Some("5,000.00 colones".to_string()),
            ..Receipt::default()
        };
        let form = Receipt {
            amount_text: Some("₡ 5,000".to_string()),
            motive: Some("pago alquiler".to_string()),
            ..Receipt::default()
        };

        let merged = extracted.or(form);
        assert_eq!(merged.amount_text.as_deref(), Some("5,000.00 colones"));
        assert_eq!(merged.motive.as_deref(), Some("pago alquiler"));
        assert!(merged.payee_name.is_none());
    }
}
