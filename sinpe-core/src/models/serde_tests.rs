//! Serde tests for core types.
//!
//! Persisted files and CLI JSON output depend on these shapes.

use chrono::NaiveDate;

use crate::{
    Contact, ContactKind, FailureKind, OutcomeKind, Provider, Receipt, TransactionOutcome,
    TransferFailure, TransferState, TransferSuccess, normalize,
};

// ============================================================================
// Directory Records
// ============================================================================

#[test]
fn test_provider_shape() {
    let provider = Provider::new("4", "BN", "2627");
    let json = serde_json::to_value(&provider).unwrap();
    assert_eq!(json["id"], "4");
    assert_eq!(json["label"], "BN");
    assert_eq!(json["value"], "2627");
}

#[test]
fn test_contact_type_field() {
    let contact = Contact::local("Ana", "88889999");
    let json = serde_json::to_value(&contact).unwrap();
    assert_eq!(json["type"], "local");

    let parsed: Contact = serde_json::from_str(r#"{"name":"Luis","number":"87776666"}"#).unwrap();
    assert_eq!(parsed.kind, ContactKind::Device);

    let legacy: Contact =
        serde_json::from_str(r#"{"type":"contact","name":"Luis","number":"87776666"}"#).unwrap();
    assert_eq!(legacy.kind, ContactKind::Device);
}

#[test]
fn test_normalized_number_is_transparent() {
    let json = serde_json::to_string(&normalize("2627")).unwrap();
    assert_eq!(json, r#""2627""#);
}

// ============================================================================
// Receipts
// ============================================================================

#[test]
fn test_receipt_camel_case() {
    let receipt = Receipt {
        reference_id: Some("2024010112345678".to_string()),
        payee_name: Some("MARIA PEREZ".to_string()),
        timestamp: NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(14, 30, 0)),
        ..Receipt::default()
    };
    let json = serde_json::to_value(&receipt).unwrap();
    assert_eq!(json["referenceId"], "2024010112345678");
    assert_eq!(json["payeeName"], "MARIA PEREZ");
    assert!(json["amountText"].is_null());

    let back: Receipt = serde_json::from_value(json).unwrap();
    assert_eq!(back, receipt);
}

// ============================================================================
// Outcomes and States
// ============================================================================

#[test]
fn test_outcome_tagging() {
    let json = serde_json::to_value(TransactionOutcome::Delivered("ok".into())).unwrap();
    assert_eq!(json["kind"], "delivered");
    assert_eq!(json["detail"], "ok");

    let json = serde_json::to_value(TransactionOutcome::TimedOut).unwrap();
    assert_eq!(json["kind"], "timed_out");
}

#[test]
fn test_outcome_kind_names_match_serde() {
    let outcomes = [
        TransactionOutcome::Delivered(String::new()),
        TransactionOutcome::TimedOut,
        TransactionOutcome::PermissionDenied,
        TransactionOutcome::TransportUnavailable,
        TransactionOutcome::Cancelled,
        TransactionOutcome::Failed(String::new()),
    ];
    for outcome in outcomes {
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], outcome.kind().as_str(), "mismatch for {outcome:?}");
    }
    assert_eq!(
        serde_json::to_string(&OutcomeKind::PermissionDenied).unwrap(),
        r#""permission_denied""#
    );
}

#[test]
fn test_transfer_state_roundtrip() {
    let states = [
        TransferState::Idle,
        TransferState::AwaitingResponse,
        TransferState::Succeeded(TransferSuccess::Plain("listo".into())),
        TransferState::Succeeded(TransferSuccess::Receipt(Receipt::new())),
        TransferState::Failed(TransferFailure {
            kind: FailureKind::TimedOut,
            reason: "late".into(),
        }),
    ];
    for state in states {
        let json = serde_json::to_string(&state).unwrap();
        let back: TransferState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}

#[test]
fn test_transfer_state_tag() {
    let json = serde_json::to_value(TransferState::AwaitingResponse).unwrap();
    assert_eq!(json["state"], "awaiting_response");
}

#[test]
fn test_unknown_outcome_rejected() {
    let result: Result<TransactionOutcome, _> = serde_json::from_str(r#"{"kind":"lost"}"#);
    assert!(result.is_err());
}
