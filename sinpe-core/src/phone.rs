//! Phone number normalization and sender matching.
//!
//! Carriers report sender ids inconsistently: with or without the `+`, with
//! or without the `506` country code, sometimes shortened. Everything that
//! compares two numbers goes through [`normalize`] and [`numbers_match`].

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

// ============================================================================
// Constants
// ============================================================================

/// Costa Rica country code, without the plus.
pub const COUNTRY_CODE: &str = "506";

/// Length of a domestic (national) number.
pub const LOCAL_NUMBER_LEN: usize = 8;

// ============================================================================
// Normalized Number
// ============================================================================

/// A phone number reduced to digits and an optional leading `+`.
///
/// Only [`normalize`] produces values of this type, so two normalized numbers
/// can be compared with the guarantee that normalizing either again is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedNumber(String);

impl NormalizedNumber {
    /// Returns the normalized text, including the leading `+` if any.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number without its leading `+`.
    pub fn digits(&self) -> &str {
        self.0.strip_prefix('+').unwrap_or(&self.0)
    }

    /// Returns true if nothing survived normalization.
    pub fn is_empty(&self) -> bool {
        self.digits().is_empty()
    }

    /// Returns true if the number carries the `+506` prefix.
    pub fn is_domestic(&self) -> bool {
        self.0.starts_with('+') && self.digits().starts_with(COUNTRY_CODE)
    }
}

impl fmt::Display for NormalizedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Canonicalizes a raw phone number.
///
/// - Every character other than digits is dropped, except a single `+`
///   appearing before the first digit.
/// - An 8-digit number without `+` is domestic and gets `+506`.
/// - A number starting with bare `506` gets a `+`.
/// - Anything else (international or malformed) passes through.
///
/// The function is total and idempotent.
pub fn normalize(raw: &str) -> NormalizedNumber {
    let mut out = String::with_capacity(raw.len() + 4);
    for c in raw.chars() {
        if c.is_ascii_digit() {
            out.push(c);
        } else if c == '+' && out.is_empty() {
            out.push(c);
        }
    }

    if !out.starts_with('+') && out.len() == LOCAL_NUMBER_LEN {
        out.insert_str(0, "+506");
    }

    if out.starts_with(COUNTRY_CODE) {
        out.insert(0, '+');
    }

    trace!(raw = %raw, normalized = %out, "Normalized phone number");
    NormalizedNumber(out)
}

/// Reduces a raw number to its 8-digit local form when it is domestic.
///
/// Returns `None` for numbers that do not end up as `+506` followed by
/// exactly eight digits.
pub fn local_part(raw: &str) -> Option<String> {
    let normalized = normalize(raw);
    let rest = normalized.digits().strip_prefix(COUNTRY_CODE)?;
    (normalized.is_domestic() && rest.len() == LOCAL_NUMBER_LEN).then(|| rest.to_string())
}

// ============================================================================
// Matching
// ============================================================================

/// Decides whether an inbound sender is the expected counterpart.
///
/// Both sides are compared without the leading `+`. They match when equal or
/// when either is a suffix of the other, which tolerates carriers that drop
/// or add the country code.
///
/// The suffix rule is an approximation: a very short sender id (a 4-digit
/// short code, say) matches any longer number that happens to end with the
/// same digits. Real provider traffic depends on it, so it is kept as is.
///
/// An absent or empty value on either side never matches.
pub fn numbers_match(candidate: Option<&str>, expected: Option<&NormalizedNumber>) -> bool {
    let (Some(candidate), Some(expected)) = (candidate, expected) else {
        return false;
    };

    let candidate = normalize(candidate);
    let clean_candidate = candidate.digits();
    let clean_expected = expected.digits();

    if clean_candidate.is_empty() || clean_expected.is_empty() {
        return false;
    }

    let matched = clean_candidate == clean_expected
        || clean_candidate.ends_with(clean_expected)
        || clean_expected.ends_with(clean_candidate);

    trace!(
        candidate = %clean_candidate,
        expected = %clean_expected,
        matched,
        "Compared sender numbers"
    );
    matched
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domestic_eight_digits() {
        assert_eq!(normalize("22761234").as_str(), "+50622761234");
        assert_eq!(normalize("2276-1234").as_str(), "+50622761234");
        assert_eq!(normalize(" 8888 9999 ").as_str(), "+50688889999");
    }

    #[test]
    fn test_bare_country_code_gets_plus() {
        assert_eq!(normalize("50622761234").as_str(), "+50622761234");
        assert_eq!(normalize("(506) 2276 1234").as_str(), "+50622761234");
    }

    #[test]
    fn test_international_passes_through() {
        assert_eq!(normalize("+1 (555) 010-9999").as_str(), "+15550109999");
        assert_eq!(normalize("+50622761234").as_str(), "+50622761234");
    }

    #[test]
    fn test_short_codes_pass_through() {
        assert_eq!(normalize("2627").as_str(), "2627");
        assert_eq!(normalize("1222").as_str(), "1222");
    }

    #[test]
    fn test_plus_only_kept_before_digits() {
        assert_eq!(normalize("++2276").as_str(), "+2276");
        assert_eq!(normalize("22+76").as_str(), "2276");
    }

    #[test]
    fn test_garbage_is_total() {
        assert!(normalize("").is_empty());
        assert!(normalize("abc").is_empty());
        assert_eq!(normalize("+").as_str(), "+");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "22761234",
            "2276-1234",
            "50622761234",
            "+50622761234",
            "506",
            "50612345",
            "2627",
            "+1 555 0100",
            "",
            "+",
            "++",
            "tel: 8888-9999",
            "123456789012345",
        ];
        for raw in samples {
            let once = normalize(raw);
            let twice = normalize(once.as_str());
            assert_eq!(once, twice, "normalize not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_local_part() {
        assert_eq!(local_part("+506 8888 9999").as_deref(), Some("88889999"));
        assert_eq!(local_part("88889999").as_deref(), Some("88889999"));
        assert_eq!(local_part("2627"), None);
        assert_eq!(local_part("+1 555 0100"), None);
    }

    #[test]
    fn test_match_country_code_variance() {
        let expected = normalize("2276-1234");
        assert!(numbers_match(Some("50622761234"), Some(&expected)));
        assert!(numbers_match(Some("+50622761234"), Some(&expected)));
        assert!(numbers_match(Some("22761234"), Some(&expected)));
    }

    #[test]
    fn test_match_short_code() {
        let expected = normalize("2627");
        assert!(numbers_match(Some("2627"), Some(&expected)));
        assert!(numbers_match(Some("+2627"), Some(&expected)));
        assert!(!numbers_match(Some("1222"), Some(&expected)));
    }

    #[test]
    fn test_match_suffix_overmatch_is_kept() {
        // Known approximation: a short id matches the tail of a longer number.
        let expected = normalize("2627");
        assert!(numbers_match(Some("88882627"), Some(&expected)));
    }

    #[test]
    fn test_match_absent_or_empty() {
        let expected = normalize("2627");
        assert!(!numbers_match(None, Some(&expected)));
        assert!(!numbers_match(Some("2627"), None));
        assert!(!numbers_match(Some(""), Some(&expected)));
        assert!(!numbers_match(Some("BN-INFO"), Some(&expected)));
    }
}
