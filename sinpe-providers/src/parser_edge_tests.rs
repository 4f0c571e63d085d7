//! Parser edge case tests.
//!
//! Replies come from several banks and change wording over time; these
//! cover partial, noisy and unusual inputs.

#[cfg(test)]
mod extraction_edge_tests {
    use crate::parser::{extract, extract_amount, extract_payee, extract_reference};

    // ========================================================================
    // Empty and Noisy Input
    // ========================================================================

    #[test]
    fn test_empty_reply() {
        let receipt = extract("");
        assert!(receipt.is_empty());
    }

    #[test]
    fn test_unrelated_reply() {
        let receipt = extract("Su saldo es insuficiente para realizar la transaccion");
        assert!(receipt.reference_id.is_none());
        assert!(receipt.amount_text.is_none());
        assert!(!receipt.is_structured());
    }

    #[test]
    fn test_unicode_noise() {
        let receipt = extract("✅ Ha pasado ₡5,000.00 colones a 88889999 de José Núñez, comprobante 77");
        assert_eq!(receipt.payee_name.as_deref(), Some("José Núñez"));
        assert_eq!(receipt.reference_id.as_deref(), Some("77"));
        assert_eq!(receipt.amount_text.as_deref(), Some("5,000.00 colones"));
    }

    // ========================================================================
    // Order Independence
    // ========================================================================

    #[test]
    fn test_fields_in_other_order() {
        let receipt = extract(
            "Comprobante 5551234: de Carla Rojas, 2,500 colones al 87776666. Ha pasado.",
        );
        assert_eq!(receipt.reference_id.as_deref(), Some("5551234"));
        assert_eq!(receipt.payee_name.as_deref(), Some("Carla Rojas"));
        assert_eq!(receipt.destination_phone.as_deref(), Some("87776666"));
        assert_eq!(receipt.amount_text.as_deref(), Some("2,500 colones"));
    }

    // ========================================================================
    // Partial Extraction
    // ========================================================================

    #[test]
    fn test_missing_reference_keeps_other_fields() {
        let receipt = extract("Ha pasado 1,000 colones a 88889999 de Juan Perez, comprobante pendiente");
        assert!(receipt.reference_id.is_none());
        assert_eq!(receipt.payee_name.as_deref(), Some("Juan Perez"));
        assert_eq!(receipt.destination_phone.as_deref(), Some("88889999"));
    }

    #[test]
    fn test_payee_at_end_without_comma() {
        assert_eq!(
            extract_payee("Recibio 100 colones de Luis Vargas").as_deref(),
            Some("Luis Vargas")
        );
    }

    #[test]
    fn test_payee_trailing_period() {
        assert_eq!(
            extract_payee("Ha pasado dinero de Ana Soto.").as_deref(),
            Some("Ana Soto")
        );
    }

    #[test]
    fn test_payee_without_name() {
        assert_eq!(extract_payee("monto de 500"), None);
    }

    #[test]
    fn test_first_reference_wins() {
        assert_eq!(
            extract_reference("comprobante 111, comprobante 222").as_deref(),
            Some("111")
        );
    }

    #[test]
    fn test_amount_in_words_is_ignored() {
        assert_eq!(extract_amount("cinco mil colones"), None);
    }

    #[test]
    fn test_amount_attached_to_currency() {
        assert_eq!(extract_amount("total 300USD").as_deref(), Some("300USD"));
    }
}

#[cfg(test)]
mod classification_edge_tests {
    use crate::parser::{ReplyClass, classify_reply, is_confirmation};

    #[test]
    fn test_markers_any_case() {
        assert!(is_confirmation("HA PASADO ... COMPROBANTE 1"));
        assert!(is_confirmation("ha pasado ... comprobante 1"));
    }

    #[test]
    fn test_marker_split_is_not_confirmation() {
        assert!(!is_confirmation("ha  pasado comprobante"));
    }

    #[test]
    fn test_receipt_marker_alone_is_rejected() {
        assert_eq!(classify_reply("Comprobante 123 anulado"), ReplyClass::Rejected);
    }

    #[test]
    fn test_structured_requires_payee() {
        assert_eq!(
            classify_reply("Ha pasado 5,000 colones, comprobante 123456"),
            ReplyClass::Plain
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ReplyClass::Plain).unwrap();
        assert_eq!(json["kind"], "plain");
    }
}
