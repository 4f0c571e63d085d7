//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use sinpe_core::{
        Contact, Provider, Receipt, TransactionOutcome, TransferFailure, TransferState,
        TransferSuccess,
    };
    use sinpe_providers::{ReplyClass, extract};
    use sinpe_store::HistoryEntry;

    fn receipt() -> Receipt {
        Receipt {
            payee_name: Some("Juan Perez".to_string()),
            reference_id: Some("123456".to_string()),
            ..Receipt::default()
        }
    }

    #[test]
    fn test_provider_line_marks_selection() {
        let formatter = TextFormatter::new(false);
        let bn = Provider::new("4", "BN", "2627");

        let selected = formatter.format_provider_line(&bn, true);
        assert!(selected.starts_with('●'));
        assert!(selected.contains("BN"));
        assert!(selected.ends_with("2627"));

        let other = formatter.format_provider_line(&bn, false);
        assert!(!other.contains('●'));
    }

    #[test]
    fn test_contact_line() {
        let formatter = TextFormatter::new(false);
        let line = formatter.format_contact_line(&Contact::local("Juan", "88889999"));
        assert!(line.starts_with("local"));
        assert!(line.ends_with("88889999"));
    }

    #[test]
    fn test_receipt_shows_missing_fields() {
        let formatter = TextFormatter::new(false);
        let text = formatter.format_receipt(&receipt());
        assert!(text.contains("Juan Perez"));
        assert!(text.contains("123456"));
        assert!(text.lines().any(|l| l.trim_start().starts_with("Motive") && l.ends_with('-')));
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn test_state_messages() {
        let formatter = TextFormatter::new(false);

        let ok = formatter.format_state(&TransferState::Succeeded(TransferSuccess::Receipt(receipt())));
        assert!(ok.starts_with("✓ Transfer confirmed"));
        assert!(ok.contains("123456"));

        let plain = formatter.format_state(&TransferState::Succeeded(TransferSuccess::Plain(
            " Ha pasado, comprobante pendiente ".to_string(),
        )));
        assert!(plain.ends_with("Ha pasado, comprobante pendiente"));

        let failed = TransferFailure::from_outcome(&TransactionOutcome::TimedOut).unwrap();
        let text = formatter.format_state(&TransferState::Failed(failed.clone()));
        assert_eq!(text, format!("✗ {}", failed.reason));

        assert_eq!(formatter.format_state(&TransferState::Idle), "Transfer cancelled");
    }

    #[test]
    fn test_reply_class() {
        let formatter = TextFormatter::new(false);
        let text = formatter.format_reply_class(&ReplyClass::Rejected, &extract("Saldo insuficiente"));
        assert!(text.starts_with("Reply: not a confirmation"));
    }

    #[test]
    fn test_history_line() {
        let formatter = TextFormatter::new(false);
        let entry = HistoryEntry::new(
            &Provider::new("4", "BN", "2627"),
            "PASE 5000 88889999 pago",
            &TransactionOutcome::TimedOut,
        );
        let line = formatter.format_history_line(&entry);
        assert!(line.contains("timed_out"));
        assert!(line.contains("BN"));
        assert!(line.ends_with("PASE 5000 88889999 pago"));
    }

    #[test]
    fn test_colors_toggle() {
        let colored = TextFormatter::new(true);
        let failed = TransferFailure::rejected("no");
        assert!(colored.format_state(&TransferState::Failed(failed.clone())).contains("\x1b[31m"));

        let plain = TextFormatter::new(false);
        assert!(!plain.format_state(&TransferState::Failed(failed)).contains('\x1b'));
    }

    #[test]
    fn test_format_error() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.format_error("send", "boom"), "✗ send: boom");
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::{JsonFormatter, TransferOutput};
    use sinpe_core::{Provider, Receipt, TransferFailure, TransferState, TransferSuccess};

    #[test]
    fn test_format_compact_and_pretty() {
        let value = serde_json::json!({"a": 1});
        assert_eq!(JsonFormatter::new(false).format(&value).unwrap(), r#"{"a":1}"#);
        assert!(JsonFormatter::new(true).format(&value).unwrap().contains('\n'));
    }

    #[test]
    fn test_providers_mark_selected() {
        let providers = [Provider::new("1", "Promerica", "6223-2450"), Provider::new("4", "BN", "2627")];
        let json = JsonFormatter::new(false)
            .format_providers(&providers, Some("4"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["selected"], false);
        assert_eq!(value[1]["selected"], true);
        assert_eq!(value[1]["value"], "2627");
    }

    #[test]
    fn test_transfer_output() {
        let bn = Provider::new("4", "BN", "2627");
        let receipt = Receipt {
            reference_id: Some("123456".into()),
            payee_name: Some("Juan Perez".into()),
            ..Receipt::default()
        };
        let state = TransferState::Succeeded(TransferSuccess::Receipt(receipt));
        let output = TransferOutput::new(&state, &bn, "PASE 5000 88889999 pago".into());
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["state"], "SUCCEEDED");
        assert_eq!(value["receipt"]["referenceId"], "123456");
        assert!(value.get("error").is_none());

        let failed = TransferState::Failed(TransferFailure::rejected("Saldo insuficiente"));
        let value = serde_json::to_value(TransferOutput::new(&failed, &bn, String::new())).unwrap();
        assert_eq!(value["state"], "FAILED");
        assert!(value["error"].as_str().unwrap().contains("Saldo insuficiente"));
    }
}
