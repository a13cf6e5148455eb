//! Numeral <-> spelled-out-word equivalence.
//!
//! Dictation transcripts spell numbers out ("nineteen twelve", "the third")
//! while hand-typed sentences often keep digits ("1912", "3rd"). This module
//! bridges the two so the aligner can treat them as the same token run.

use num2words::Num2Words;

/// Parses a digit token (optionally comma-grouped, optionally with an
/// ordinal suffix like `3rd`) into an integer.
pub fn parse_numeric(token: &str) -> Option<i64> {
    let stripped = token.replace(',', "");
    let digits: String = stripped
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    let rest = &stripped[digits.len()..];
    if rest.is_empty() || is_ordinal_suffix(rest) {
        digits.parse().ok()
    } else {
        None
    }
}

fn is_ordinal_suffix(s: &str) -> bool {
    matches!(s, "st" | "nd" | "rd" | "th")
}

fn is_ordinal_token(token: &str) -> bool {
    let stripped = token.replace(',', "");
    let digits: String = stripped
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    !digits.is_empty() && is_ordinal_suffix(&stripped[digits.len()..])
}

fn cardinal_words(n: i64) -> Option<String> {
    Num2Words::new(n)
        .cardinal()
        .to_words()
        .ok()
        .map(|w| w.replace('-', " "))
}

fn ordinal_words(n: i64) -> Option<String> {
    Num2Words::new(n)
        .ordinal()
        .to_words()
        .ok()
        .map(|w| w.replace('-', " "))
}

/// Spoken "century + remainder" year form, e.g. 1912 -> "nineteen twelve",
/// 1900 -> "nineteen hundred". Only defined for 1000-2099, matching the
/// range dictation tools treat as a year rather than a plain cardinal.
fn year_words(n: i64) -> Option<String> {
    if !(1000..=2099).contains(&n) {
        return None;
    }
    let century = n / 100;
    let remainder = n % 100;
    let century_words = cardinal_words(century)?;
    if remainder == 0 {
        Some(format!("{century_words} hundred"))
    } else if remainder < 10 {
        let remainder_words = cardinal_words(remainder)?;
        Some(format!("{century_words} oh {remainder_words}"))
    } else {
        let remainder_words = cardinal_words(remainder)?;
        Some(format!("{century_words} {remainder_words}"))
    }
}

/// True when `numeric` (a digit token, e.g. `"1912"` or `"3rd"`) and `words`
/// (the whitespace-joined spelled-out candidate, e.g. `"nineteen twelve"`)
/// denote the same number under any of the cardinal, ordinal, or year forms.
pub fn numeric_words_equivalent(numeric: &str, words: &str) -> bool {
    let Some(n) = parse_numeric(numeric) else {
        return false;
    };
    let words = words.trim();

    if is_ordinal_token(numeric) {
        if let Some(ord) = ordinal_words(n) {
            if ord == words {
                return true;
            }
        }
    } else {
        if let Some(card) = cardinal_words(n) {
            if card == words {
                return true;
            }
        }
        if let Some(year) = year_words(n) {
            if year == words {
                return true;
            }
        }
    }
    false
}

/// Direct numeric comparison for two digit tokens (handles comma grouping
/// and a trailing ordinal suffix on either side).
pub fn numeric_values_equal(a: &str, b: &str) -> bool {
    match (parse_numeric(a), parse_numeric(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
