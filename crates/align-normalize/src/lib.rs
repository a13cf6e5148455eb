//! Text canonicalization and fuzzy-equivalence rules shared by every stage
//! of the alignment pipeline.
//!
//! A sentence and the words an ASR system produced rarely agree
//! character-for-character even when they describe the same speech: casing,
//! punctuation, numeral spelling, contractions, and hyphenation all drift.
//! This crate normalizes both sides to a common form and exposes the fuzzy
//! equivalence predicate ([`tokens_match`]) the rest of the pipeline treats
//! as ground truth for "these two tokens are the same word".

mod contractions;
mod equivalence;
mod numerals;
mod token;
mod units;

pub use contractions::expand as expand_contraction;
pub use equivalence::{edit_ratio, tokens_match, DEFAULT_EDIT_RATIO_THRESHOLD};
pub use numerals::{numeric_values_equal, numeric_words_equivalent, parse_numeric};
pub use token::{normalize_token, strip_embedded_quotes, tokenize_sentence};

#[cfg(test)]
mod property_tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn normalize_is_idempotent(s: String) -> bool {
        let once = normalize_token(&s);
        let twice = normalize_token(&once);
        once == twice
    }

    #[quickcheck]
    fn tokens_match_is_reflexive(s: String) -> bool {
        let norm = normalize_token(&s);
        tokens_match(&norm, &norm, DEFAULT_EDIT_RATIO_THRESHOLD)
    }

    #[quickcheck]
    fn edit_ratio_is_symmetric(a: String, b: String) -> bool {
        edit_ratio(&a, &b) == edit_ratio(&b, &a)
    }

    #[quickcheck]
    fn edit_ratio_bounded(a: String, b: String) -> bool {
        let r = edit_ratio(&a, &b);
        r <= 100
    }
}
