use std::collections::HashMap;

use align_normalize::parse_numeric;

use crate::types::Anchor;

/// Closed-class function words excluded from anchor eligibility regardless
/// of how rare they are in a given transcription.
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "nor", "so", "yet", "for",
    "of", "to", "in", "on", "at", "by", "with", "from", "as", "into",
    "onto", "upon", "over", "under", "about", "through", "during", "before",
    "after", "above", "below", "between", "among",
    "is", "am", "are", "was", "were", "be", "been", "being",
    "do", "does", "did", "have", "has", "had",
    "i", "me", "my", "mine", "you", "your", "yours", "he", "him", "his",
    "she", "her", "hers", "it", "its", "we", "us", "our", "ours",
    "they", "them", "their", "theirs", "this", "that", "these", "those",
    "who", "whom", "which", "what",
    "not", "no", "if", "then", "than", "there", "here",
];

pub(crate) fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Inverse document frequency over the full transcription token stream:
/// `idf(t) = 1 / (1 + count(t) / N)`. Numeric tokens receive a flat `+1.0`
/// bonus on top of their computed idf to prioritize them as anchors.
pub struct IdfTable {
    counts: HashMap<String, usize>,
    total: usize,
}

impl IdfTable {
    pub fn build<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut total = 0usize;
        for tok in tokens {
            *counts.entry(tok.to_string()).or_insert(0) += 1;
            total += 1;
        }
        Self { counts, total }
    }

    fn count(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    pub fn idf(&self, token: &str) -> f64 {
        let n = self.total.max(1) as f64;
        let c = self.count(token) as f64;
        let base = 1.0 / (1.0 + c / n);
        if parse_numeric(token).is_some() {
            base + 1.0
        } else {
            base
        }
    }
}

fn is_anchor_eligible(token: &str) -> bool {
    if token.is_empty() || is_stopword(token) {
        return false;
    }
    parse_numeric(token).is_some() || token.chars().count() >= 5
}

/// Selects up to `max_anchors` highest-idf eligible tokens from `tokens`,
/// preserving the tokens' original in-sentence order in the output.
pub fn extract_anchors(tokens: &[String], idf: &IdfTable, max_anchors: usize) -> Vec<Anchor> {
    let mut scored: Vec<(usize, &str, f64)> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| is_anchor_eligible(t))
        .map(|(i, t)| (i, t.as_str(), idf.idf(t)))
        .collect();

    scored.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(max_anchors);
    scored.sort_by_key(|(i, _, _)| *i);

    scored
        .into_iter()
        .map(|(_, t, w)| Anchor {
            token: t.to_string(),
            weight: w,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopwords_are_excluded() {
        assert!(!is_anchor_eligible("the"));
        assert!(!is_anchor_eligible("and"));
    }

    #[test]
    fn short_non_numeric_tokens_are_excluded() {
        assert!(!is_anchor_eligible("cat"));
    }

    #[test]
    fn long_tokens_are_eligible() {
        assert!(is_anchor_eligible("elephant"));
    }

    #[test]
    fn numeric_tokens_are_eligible_regardless_of_length() {
        assert!(is_anchor_eligible("42"));
    }

    #[test]
    fn numeric_tokens_get_idf_bonus() {
        let idf = IdfTable::build(["42", "elephant", "elephant", "elephant"]);
        assert!(idf.idf("42") > idf.idf("elephant"));
    }

    #[test]
    fn rarer_tokens_score_higher() {
        let idf = IdfTable::build(["rare", "common", "common", "common", "common"]);
        assert!(idf.idf("rare") > idf.idf("common"));
    }

    #[test]
    fn extract_anchors_caps_at_max_and_preserves_order() {
        let tokens: Vec<String> = vec!["xylophone", "the", "quantify", "trombone", "saxophone"]
            .into_iter()
            .map(String::from)
            .collect();
        let idf = IdfTable::build(tokens.iter().map(|s| s.as_str()));
        let anchors = extract_anchors(&tokens, &idf, 3);
        assert!(anchors.len() <= 3);
        let positions: Vec<usize> = anchors
            .iter()
            .map(|a| tokens.iter().position(|t| t == &a.token).unwrap())
            .collect();
        let mut sorted_positions = positions.clone();
        sorted_positions.sort();
        assert_eq!(positions, sorted_positions);
    }

    #[test]
    fn absent_anchor_contributes_zero_but_remains_listed() {
        let tokens: Vec<String> = vec!["unicorn".to_string()];
        let idf = IdfTable::build(std::iter::empty::<&str>());
        let anchors = extract_anchors(&tokens, &idf, 3);
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].token, "unicorn");
    }
}
