//! Provider reply parsing.
//!
//! Each receipt field has its own rule. Rules are independent and do not
//! depend on the order of phrases in the reply; a rule that finds nothing
//! leaves its field empty.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sinpe_core::Receipt;
use std::sync::LazyLock;
use tracing::debug;

use crate::markers::{
    CURRENCY_WORDS, DESTINATION_PREPOSITIONS, PAYEE_PREPOSITION, RECEIPT_MARKER, SUCCESS_MARKER,
    contains_marker,
};

// ============================================================================
// Regex Patterns
// ============================================================================

fn alternation(words: &[&str]) -> String {
    let mut words: Vec<&str> = words.to_vec();
    // Longest first so "al" is preferred over "a".
    words.sort_by_key(|w| std::cmp::Reverse(w.len()));
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

/// Amount with optional grouping and 2-digit fraction, then a currency word.
static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:\d{{1,3}}(?:[.,]\d{{3}})+|\d+)(?:[.,]\d{{2}})?\s*(?:{})\b",
        alternation(CURRENCY_WORDS)
    ))
    .expect("Invalid regex")
});

/// Eight digits right after "a" / "al".
static DESTINATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{})\s+(\d{{8}})\b",
        alternation(DESTINATION_PREPOSITIONS)
    ))
    .expect("Invalid regex")
});

/// Name after "de", up to the next comma or line end.
static PAYEE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b{}\s+(\p{{L}}[^,\n]*)",
        regex::escape(PAYEE_PREPOSITION)
    ))
    .expect("Invalid regex")
});

/// Inner "de" separating nested segments.
static PAYEE_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\s+{}\s+", regex::escape(PAYEE_PREPOSITION)))
        .expect("Invalid regex")
});

/// Digits after "comprobante", optionally with "No." / ":" / "#".
static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b{}\s*(?:(?:No|N[°º])\.?)?\s*:?\s*#?\s*(\d+)",
        regex::escape(RECEIPT_MARKER)
    ))
    .expect("Invalid regex")
});

/// `dd/mm/yyyy` with an optional `hh:mm[:ss]`.
static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})(?:\s+(\d{1,2}):(\d{2})(?::(\d{2}))?)?")
        .expect("Invalid regex")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

// ============================================================================
// Field Rules
// ============================================================================

/// Amount with its currency word, e.g. "5,000.00 colones".
pub fn extract_amount(reply: &str) -> Option<String> {
    AMOUNT_RE
        .find(reply)
        .map(|m| WHITESPACE_RE.replace_all(m.as_str(), " ").into_owned())
}

/// Destination number following "a" or "al".
pub fn extract_destination(reply: &str) -> Option<String> {
    DESTINATION_RE
        .captures(reply)
        .map(|caps| caps[1].to_string())
}

/// Payee name following "de".
///
/// When the captured span holds another "de" ("de la cuenta de Juan Perez")
/// the last segment is the name.
pub fn extract_payee(reply: &str) -> Option<String> {
    let caps = PAYEE_RE.captures(reply)?;
    let span = caps.get(1)?.as_str();
    let name = PAYEE_SPLIT_RE.split(span).last()?;
    let name = name.trim().trim_end_matches(['.', ';']).trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Confirmation number following "comprobante".
pub fn extract_reference(reply: &str) -> Option<String> {
    REFERENCE_RE
        .captures(reply)
        .map(|caps| caps[1].to_string())
}

/// Transfer date and time, if the reply carries one.
///
/// A date without a time is taken at midnight. Impossible dates are ignored.
pub fn extract_timestamp(reply: &str) -> Option<NaiveDateTime> {
    let caps = TIMESTAMP_RE.captures(reply)?;
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let day = num(1)?;
    let month = num(2)?;
    let year = i32::try_from(num(3)?).ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    date.and_hms_opt(num(4).unwrap_or(0), num(5).unwrap_or(0), num(6).unwrap_or(0))
}

/// Runs every field rule over a reply.
pub fn extract(reply: &str) -> Receipt {
    let receipt = Receipt {
        amount_text: extract_amount(reply),
        destination_phone: extract_destination(reply),
        payee_name: extract_payee(reply),
        reference_id: extract_reference(reply),
        motive: None,
        timestamp: extract_timestamp(reply),
    };
    debug!(
        has_amount = receipt.amount_text.is_some(),
        has_destination = receipt.destination_phone.is_some(),
        has_payee = receipt.payee_name.is_some(),
        has_reference = receipt.reference_id.is_some(),
        has_timestamp = receipt.timestamp.is_some(),
        "Extracted receipt fields"
    );
    receipt
}

// ============================================================================
// Classification
// ============================================================================

/// True if the reply confirms the transfer.
///
/// Requires both the success marker and the receipt marker.
pub fn is_confirmation(reply: &str) -> bool {
    contains_marker(reply, SUCCESS_MARKER) && contains_marker(reply, RECEIPT_MARKER)
}

/// How a reply should be presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "receipt", rename_all = "snake_case")]
pub enum ReplyClass {
    /// Confirmed, with reference id and payee recovered.
    Structured(Receipt),
    /// Confirmed, but the receipt is incomplete; show the reply text.
    Plain,
    /// Not a confirmation.
    Rejected,
}

impl ReplyClass {
    /// Returns true for confirmed replies.
    pub fn is_confirmed(&self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Classifies a delivered reply.
pub fn classify_reply(reply: &str) -> ReplyClass {
    if !is_confirmation(reply) {
        debug!("Reply lacks confirmation markers");
        return ReplyClass::Rejected;
    }
    let receipt = extract(reply);
    if receipt.is_structured() {
        ReplyClass::Structured(receipt)
    } else {
        ReplyClass::Plain
    }
}

// ============================================================================
// Tests
// ============================================================================
