use align_normalize::{edit_ratio, expand_contraction, parse_numeric, tokens_match};

use crate::anchors::is_stopword;
use crate::config::ScoringWeights;
use crate::types::{Anchor, CandidateSpan};

/// A near-perfect similarity credited to a sentence token matched via
/// concatenating 2-3 consecutive span tokens (hyphens stripped) rather than
/// a direct one-to-one token match.
const COMPOUND_MATCH_SIMILARITY: f64 = 0.95;

fn token_weight(token: &str) -> f64 {
    if parse_numeric(token).is_some() {
        1.25
    } else if is_stopword(token) {
        0.5
    } else {
        1.0
    }
}

/// Best similarity in `[0,1]` for sentence token `s` against the span
/// tokens `w`, trying a direct match first and, when `s` looks
/// compound-shaped (contains a hyphen or is longer than 8 characters),
/// 2- and 3-word concatenations of consecutive span tokens.
fn best_match_similarity(s: &str, w: &[String], token_ratio_cutoff: u32) -> Option<f64> {
    let mut best: Option<f64> = None;

    for cand in w {
        if tokens_match(s, cand, token_ratio_cutoff) {
            let sim = edit_ratio(s, cand) as f64 / 100.0;
            best = Some(best.map_or(sim, |b: f64| b.max(sim)));
        }
    }

    if let Some(expansion) = expand_contraction(s) {
        for pair in w.windows(2) {
            let joined = format!("{} {}", pair[0], pair[1]);
            if joined == expansion {
                best = Some(best.map_or(1.0, |b: f64| b.max(1.0)));
            }
        }
    }

    // A numeral like "1912" only has a single-token direct form in
    // `tokens_match` (digit-vs-digit or digit-vs-pre-joined phrase); the
    // spelled-out transcription form ("nineteen twelve") arrives as
    // separate span tokens, so try 2-/3-word concatenations the same way
    // the compound-word path does for hyphenated sentence tokens.
    if parse_numeric(s).is_some() {
        for window in [2usize, 3usize] {
            if w.len() < window {
                continue;
            }
            for start in 0..=(w.len() - window) {
                let joined = w[start..start + window].join(" ");
                if tokens_match(s, &joined, token_ratio_cutoff) {
                    best = Some(best.map_or(1.0, |b: f64| b.max(1.0)));
                }
            }
        }
    }

    let compound_shaped = s.contains('-') || s.chars().count() > 8;
    if compound_shaped {
        for window in [2usize, 3usize] {
            if w.len() < window {
                continue;
            }
            for start in 0..=(w.len() - window) {
                let joined: String = w[start..start + window]
                    .iter()
                    .map(|t| t.replace('-', ""))
                    .collect::<Vec<_>>()
                    .join("");
                let s_stripped: String = s.chars().filter(|&c| c != '-').collect();
                if joined == s_stripped {
                    best = Some(best.map_or(COMPOUND_MATCH_SIMILARITY, |b: f64| {
                        b.max(COMPOUND_MATCH_SIMILARITY)
                    }));
                }
            }
        }
    }

    best
}

/// First `n` adjacent-token bigrams of `tokens`, space-joined.
fn bigrams(tokens: &[String], n: usize) -> Vec<String> {
    tokens
        .windows(2)
        .take(n)
        .map(|w| format!("{} {}", w[0], w[1]))
        .collect()
}

/// Scores a candidate span's tokens `w` against a sentence's tokens `s` and
/// its anchors, returning the five sub-signals and composite score. The
/// caller is responsible for attaching `start_idx`/`end_idx`.
pub fn score_span(
    s: &[String],
    w: &[String],
    anchors: &[Anchor],
    weights: &ScoringWeights,
    token_ratio_cutoff: u32,
) -> CandidateSpan {
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    let mut matched = 0usize;

    for tok in s {
        let weight = token_weight(tok);
        weight_total += weight;
        if let Some(sim) = best_match_similarity(tok, w, token_ratio_cutoff) {
            weighted_sum += weight * sim;
            matched += 1;
        }
    }

    let token_sim = if weight_total > 0.0 {
        weighted_sum / weight_total
    } else {
        0.0
    };

    let coverage = if s.is_empty() {
        0.0
    } else {
        matched as f64 / s.len() as f64
    };

    let len_excess = w.len().saturating_sub(s.len()) as f64;
    let unmatched = s.len().saturating_sub(matched) as f64;
    let gap_penalty = 0.02 * len_excess + 0.03 * unmatched;

    let anchor_bonus = if anchors.is_empty() {
        1.0
    } else {
        let matched_anchors = anchors
            .iter()
            .filter(|a| best_match_similarity(&a.token, w, token_ratio_cutoff).is_some())
            .count();
        matched_anchors as f64 / anchors.len() as f64
    };

    let joined_w = w.join(" ");
    let bigram_hits = bigrams(s, 5)
        .iter()
        .filter(|bg| joined_w.contains(bg.as_str()))
        .count();
    let bigram_bonus = (bigram_hits as f64 * 0.01).min(0.05);

    let score = weights.token_sim * token_sim + weights.coverage * coverage
        - weights.gap_penalty * gap_penalty
        + weights.anchor_bonus * anchor_bonus
        + weights.bigram_bonus * bigram_bonus;

    CandidateSpan {
        start_idx: 0,
        end_idx: 0,
        score,
        token_sim,
        coverage,
        gap_penalty,
        anchor_bonus,
        bigram_bonus,
    }
}
