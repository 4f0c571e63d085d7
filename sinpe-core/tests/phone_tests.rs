//! Integration tests for phone handling and command composition.

use sinpe_core::{Provider, TransferCommand, normalize, numbers_match};

#[test]
fn test_provider_reply_matches_across_formats() {
    let provider = Provider::new("1", "Promerica", "6223-2450");
    let expected = provider.normalized_number();

    for sender in ["62232450", "+50662232450", "50662232450", "6223 2450"] {
        assert!(
            numbers_match(Some(sender), Some(&expected)),
            "{sender} should match {expected}"
        );
    }
    assert!(!numbers_match(Some("62232451"), Some(&expected)));
}

#[test]
fn test_short_code_provider() {
    let provider = Provider::new("4", "BN", "2627");
    assert_eq!(provider.normalized_number().as_str(), "2627");
    assert!(numbers_match(Some("2627"), Some(&provider.normalized_number())));
    assert!(provider.has_number("2627"));
    assert!(!provider.has_number("1222"));
}

#[test]
fn test_normalize_output_alphabet() {
    for raw in ["(506) 8888-9999", "+1-555-0100", "tel:2627", "++--", "50612"] {
        let normalized = normalize(raw);
        let text = normalized.as_str();
        assert!(
            text.chars().enumerate().all(|(i, c)| c.is_ascii_digit() || (i == 0 && c == '+')),
            "unexpected output {text:?} for {raw:?}"
        );
    }
}

#[test]
fn test_command_for_contact() {
    let cmd = TransferCommand::new("₡ 12,500", "+506 8765 4321", "almuerzo").unwrap();
    assert_eq!(cmd.to_sms_text(), "PASE 12500 87654321 almuerzo");
}
