//! Fuzzy token equivalence: the single predicate the rest of the alignment
//! core consults whenever a candidate span's tokens are compared against a
//! sentence's tokens.

use crate::{contractions, numerals, units};

/// Default similarity threshold (0-100 scale) above which two tokens are
/// considered an edit-distance match even though they are not identical.
pub const DEFAULT_EDIT_RATIO_THRESHOLD: u32 = 92;

/// Normalized edit-ratio similarity between two strings on a 0-100 scale,
/// computed over Unicode scalar values via a Levenshtein distance.
///
/// `100` means identical, `0` means completely dissimilar. Empty-vs-empty
/// is defined as a perfect match.
pub fn edit_ratio(a: &str, b: &str) -> u32 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    if a_len == 0 && b_len == 0 {
        return 100;
    }
    let max_len = a_len.max(b_len);
    if max_len == 0 {
        return 100;
    }
    let dist = strsim::levenshtein(a, b);
    let similarity = 1.0 - (dist as f64 / max_len as f64);
    (similarity.max(0.0) * 100.0).round() as u32
}

/// True when `a` and `b` are the same token after stripping in-word hyphens
/// and requiring the stripped form to carry enough signal (length > 3) to
/// avoid false positives on short fragments.
fn hyphen_compound_equivalent(a: &str, b: &str) -> bool {
    let strip = |s: &str| s.chars().filter(|&c| c != '-').collect::<String>();
    let (sa, sb) = (strip(a), strip(b));
    sa.chars().count() > 3 && sa == sb && a != b
}

/// Fuzzy equivalence between two already-normalized tokens: exact match,
/// edit-ratio similarity above `threshold`, numeric equivalence (direct
/// value or digit-vs-spelled-out-word comparison against a multi-word
/// candidate), hyphen/compounding equivalence, unit-abbreviation
/// equivalence, or contraction equivalence.
///
/// `b` may be a single token or a whitespace-joined run of tokens (for the
/// numeral and unit rules, where the spelled-out form is multiple words).
pub fn tokens_match(a: &str, b: &str, threshold: u32) -> bool {
    if a == b {
        return true;
    }
    if numerals::parse_numeric(a).is_some() && numerals::parse_numeric(b).is_some() {
        if numerals::numeric_values_equal(a, b) {
            return true;
        }
    }
    if numerals::parse_numeric(a).is_some() && numerals::numeric_words_equivalent(a, b) {
        return true;
    }
    if numerals::parse_numeric(b).is_some() && numerals::numeric_words_equivalent(b, a) {
        return true;
    }
    if units::unit_equivalent(a, b) {
        return true;
    }
    if contractions::contraction_equivalent(a, b) {
        return true;
    }
    if hyphen_compound_equivalent(a, b) {
        return true;
    }
    // Edit-ratio is the last resort and only meaningful token-to-token
    // (not against a multi-word phrase).
    if !a.contains(' ') && !b.contains(' ') && edit_ratio(a, b) >= threshold {
        return true;
    }
    false
}
