use unicode_normalization::UnicodeNormalization;

/// Normalize a single token to a common comparison form.
///
/// Applies, in order: Unicode compatibility folding, lowercasing, quote and
/// dash canonicalization, in-word hyphen collapse, acronym-dot stripping,
/// punctuation removal (apostrophes inside a word are kept), and whitespace
/// trimming. Never fails — an empty token is a valid output.
pub fn normalize_token(token: &str) -> String {
    if token.is_empty() {
        return String::new();
    }

    let folded: String = token.nfkc().collect();
    let lowered = folded.to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    let chars: Vec<char> = lowered.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let mapped = match c {
            '\u{2018}' | '\u{2019}' | '\u{201B}' => Some('\''),
            '\u{201C}' | '\u{201D}' | '\u{201F}' => Some('"'),
            '\u{2014}' => Some(' '), // em dash -> space
            '\u{2013}' => Some('-'), // en dash -> hyphen
            _ => None,
        };
        out.push(mapped.unwrap_or(c));
        i += 1;
    }

    let collapsed = collapse_inword_hyphens(&out);
    let deacronymed = strip_acronym_dots(&collapsed);
    let stripped = strip_punctuation_keep_apostrophes(&deacronymed);

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `letter-hyphen-letter` -> letters joined (`ice-breaker` -> `icebreaker`).
fn collapse_inword_hyphens(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '-'
            && i > 0
            && i + 1 < chars.len()
            && is_word_char(chars[i - 1])
            && is_word_char(chars[i + 1])
        {
            // drop the hyphen, letters on both sides already emitted/queued
            i += 1;
            continue;
        }
        out.push(c);
        i += 1;
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\''
}

/// Strips dots from all-caps acronym shapes (`U.S.` -> `US`, `NASA` unaffected
/// since it has no dots). Operates on the original-cased run before
/// lowercasing would have destroyed the "all caps" signal, so this must run
/// on text that still carries a dot-separated acronym shape regardless of
/// case — we detect the shape `x.x.` (single char, dot, repeated).
fn strip_acronym_dots(s: &str) -> String {
    let is_acronym_shape = {
        let parts: Vec<&str> = s.split('.').collect();
        parts.len() > 2
            && parts
                .iter()
                .all(|p| p.is_empty() || p.chars().all(|c| c.is_alphabetic()) && p.len() <= 1)
    };
    if is_acronym_shape {
        s.chars().filter(|&c| c != '.').collect()
    } else {
        s.to_string()
    }
}

fn strip_punctuation_keep_apostrophes(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() || c.is_whitespace() {
            out.push(c);
        } else if c == '\'' {
            let prev_word = i > 0 && chars[i - 1].is_alphanumeric();
            let next_word = i + 1 < chars.len() && chars[i + 1].is_alphanumeric();
            if prev_word && next_word {
                out.push(c);
            } else {
                out.push(' ');
            }
        } else {
            out.push(' ');
        }
    }
    out
}

/// Extracts maximal runs of word characters (letters/digits, possibly
/// containing an apostrophe) from a sentence. Empty tokens are discarded.
pub fn tokenize_sentence(text: &str) -> Vec<String> {
    let normalized = normalize_token(text);
    let mut tokens = Vec::new();
    let mut current = String::new();

    let chars: Vec<char> = normalized.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            current.push(c);
        } else if c == '\''
            && !current.is_empty()
            && i + 1 < chars.len()
            && chars[i + 1].is_alphanumeric()
        {
            current.push(c);
        } else {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens.into_iter().filter(|t| !t.is_empty()).collect()
}

/// Strips quotation marks (straight or curly, single or double) embedded
/// within a larger run of text, so `"Hello," he said, "world."` tokenizes
/// identically to `Hello, he said, world.`.
pub fn strip_embedded_quotes(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '"' | '\'' | '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize_token("  Hello  "), "hello");
    }

    #[test]
    fn collapses_inword_hyphens() {
        assert_eq!(normalize_token("ice-breaker"), "icebreaker");
    }

    #[test]
    fn keeps_intraword_apostrophes() {
        assert_eq!(normalize_token("don't"), "don't");
    }

    #[test]
    fn strips_acronym_dots() {
        assert_eq!(normalize_token("U.S.A."), "usa");
    }

    #[test]
    fn curly_quotes_fold_to_straight() {
        assert_eq!(normalize_token("\u{2018}hello\u{2019}"), "hello");
    }

    #[test]
    fn empty_is_valid() {
        assert_eq!(normalize_token(""), "");
        assert_eq!(normalize_token("..."), "");
    }

    #[test]
    fn idempotent() {
        let cases = ["Hello, World!", "don't", "ice-breaker", "U.S.A.", "  "];
        for c in cases {
            let once = normalize_token(c);
            let twice = normalize_token(&once);
            assert_eq!(once, twice, "not idempotent for {c:?}");
        }
    }

    #[test]
    fn tokenizes_sentence() {
        let toks = tokenize_sentence("The sea is deep.");
        assert_eq!(toks, vec!["the", "sea", "is", "deep"]);
    }

    #[test]
    fn tokenizes_keeps_contractions_together() {
        let toks = tokenize_sentence("I don't know.");
        assert_eq!(toks, vec!["i", "don't", "know"]);
    }

    #[test]
    fn strips_embedded_quotes() {
        let stripped = strip_embedded_quotes("\"Hello,\" he said, \"world.\"");
        assert_eq!(stripped, "Hello, he said, world.");
    }
}
