use align_normalize::{expand_contraction, normalize_token, tokenize_sentence, tokens_match};

use crate::anchors::{extract_anchors, IdfTable};
use crate::config::{AlignConfig, ScoringWeights, ANCHOR_NARROWING_PREFIX};
use crate::scorer::score_span;
use crate::types::{AlignMethod, Anchor, CandidateSpan, ResolvedSpan, SpanStatus, Word};

/// Drives monotonic, windowed, anchor-narrowed candidate search over a word
/// stream. Single-threaded and deterministic: the cursor invariant only
/// holds under strictly sequential sentence processing.
pub struct LocalAligner {
    normalized_words: Vec<String>,
    start_ms: Vec<u64>,
    end_ms: Vec<u64>,
    idf: IdfTable,
    cursor: usize,
}

struct PassParams<'a> {
    elastic_gap: usize,
    token_ratio_cutoff: u32,
    weights: &'a ScoringWeights,
}

impl LocalAligner {
    pub fn new(words: &[Word]) -> Self {
        let normalized_words: Vec<String> =
            words.iter().map(|w| normalize_token(&w.text)).collect();
        let idf = IdfTable::build(normalized_words.iter().map(|s| s.as_str()));
        let start_ms = words.iter().map(|w| w.start_ms).collect();
        let end_ms = words.iter().map(|w| w.end_ms).collect();
        Self {
            normalized_words,
            start_ms,
            end_ms,
            idf,
            cursor: 0,
        }
    }

    /// Padded `(start_ms, end_ms)` for a resolved `[start_idx, end_idx]`
    /// word-index span, per §4.3's padding application.
    fn padded_times(&self, start_idx: usize, end_idx: usize, pad_ms: u64) -> (u64, u64) {
        let start = self.start_ms[start_idx].saturating_sub(pad_ms);
        let end = self.end_ms[end_idx] + pad_ms;
        (start, end)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn word_count(&self) -> usize {
        self.normalized_words.len()
    }

    /// Finds the window slice to search, narrowing around an anchor
    /// occurrence found in the window's first [`ANCHOR_NARROWING_PREFIX`]
    /// words, per §4.4.
    fn search_window(&self, start: usize, window_len: usize, anchors: &[Anchor]) -> (usize, usize) {
        let n = self.word_count();
        let end = n.min(start + window_len);
        let prefix_end = end.min(start + ANCHOR_NARROWING_PREFIX);

        let mut anchor_positions = Vec::new();
        for pos in start..prefix_end {
            if anchors
                .iter()
                .any(|a| self.normalized_words[pos] == a.token)
            {
                anchor_positions.push(pos);
            }
        }

        if let (Some(&min_pos), Some(&max_pos)) =
            (anchor_positions.iter().min(), anchor_positions.iter().max())
        {
            let narrowed_start = start.max(min_pos.saturating_sub(50));
            let narrowed_end = n.min(max_pos + 150);
            (narrowed_start, narrowed_end)
        } else {
            (start, end)
        }
    }

    fn generate_candidates(
        &self,
        sentence_tokens: &[String],
        anchors: &[Anchor],
        window_start: usize,
        window_end: usize,
        params: &PassParams,
    ) -> Vec<CandidateSpan> {
        let m = sentence_tokens.len();
        if m == 0 || window_start >= window_end {
            return Vec::new();
        }

        let first_token = &sentence_tokens[0];
        let mut candidates = Vec::new();

        for start_idx in window_start..window_end {
            let w0 = &self.normalized_words[start_idx];
            let starts_here = tokens_match(first_token, w0, params.token_ratio_cutoff)
                || anchors
                    .iter()
                    .any(|a| tokens_match(&a.token, w0, params.token_ratio_cutoff))
                || expand_contraction(first_token)
                    .and_then(|e| e.split(' ').next().map(|head| head == w0))
                    .unwrap_or(false);
            if !starts_here {
                continue;
            }

            let expected_end = start_idx + m - 1;
            let lo = expected_end.saturating_sub(params.elastic_gap).max(start_idx);
            let hi = (expected_end + params.elastic_gap).min(window_end - 1);

            for end_idx in lo..=hi {
                if end_idx < start_idx {
                    continue;
                }
                let span_tokens = &self.normalized_words[start_idx..=end_idx];
                let mut scored = score_span(
                    sentence_tokens,
                    span_tokens,
                    anchors,
                    params.weights,
                    params.token_ratio_cutoff,
                );
                scored.start_idx = start_idx;
                scored.end_idx = end_idx;
                candidates.push(scored);
            }
        }

        candidates
    }

    fn best_candidate(candidates: Vec<CandidateSpan>) -> Option<CandidateSpan> {
        candidates.into_iter().fold(None, |best, cand| match best {
            None => Some(cand),
            Some(b) => {
                if cand.score > b.score {
                    Some(cand)
                } else if cand.score == b.score {
                    if cand.start_idx < b.start_idx {
                        Some(cand)
                    } else if cand.start_idx == b.start_idx
                        && (cand.end_idx - cand.start_idx) < (b.end_idx - b.start_idx)
                    {
                        Some(cand)
                    } else {
                        Some(b)
                    }
                } else {
                    Some(b)
                }
            }
        })
    }

    /// Aligns a single sentence, advancing the cursor on success and
    /// leaving it untouched on total failure (strict + fallback both miss,
    /// or the sentence is empty after normalization).
    pub fn align_sentence(
        &mut self,
        sentence_idx: usize,
        sentence_text: &str,
        config: &AlignConfig,
    ) -> ResolvedSpan {
        let sentence_tokens = tokenize_sentence(sentence_text);
        if sentence_tokens.is_empty() {
            return ResolvedSpan {
                sentence_idx,
                start_idx: None,
                end_idx: None,
                start_ms: None,
                end_ms: None,
                status: SpanStatus::Unaligned,
                score: None,
                method: AlignMethod::Local,
                warning: Some("empty".to_string()),
            };
        }

        let anchors = extract_anchors(&sentence_tokens, &self.idf, config.max_anchors);

        let (strict_start, strict_end) =
            self.search_window(self.cursor, config.window_tokens, &anchors);
        let strict_params = PassParams {
            elastic_gap: config.elastic_gap,
            token_ratio_cutoff: config.token_ratio_cutoff,
            weights: &config.weights,
        };
        let strict_candidates = self.generate_candidates(
            &sentence_tokens,
            &anchors,
            strict_start,
            strict_end,
            &strict_params,
        );
        let strict_best = Self::best_candidate(strict_candidates);
        tracing::debug!(
            sentence_idx,
            window = ?(strict_start, strict_end),
            best_score = strict_best.as_ref().map(|b| b.score),
            "strict pass scored"
        );

        if let Some(best) = &strict_best {
            if best.score >= config.min_accept {
                self.cursor = best.end_idx + 1;
                let (start_ms, end_ms) =
                    self.padded_times(best.start_idx, best.end_idx, config.pad_ms);
                return ResolvedSpan {
                    sentence_idx,
                    start_idx: Some(best.start_idx),
                    end_idx: Some(best.end_idx),
                    start_ms: Some(start_ms),
                    end_ms: Some(end_ms),
                    status: SpanStatus::Ok,
                    score: Some(best.score),
                    method: AlignMethod::Local,
                    warning: None,
                };
            }
            if best.score >= config.warn_accept {
                self.cursor = best.end_idx + 1;
                let (start_ms, end_ms) =
                    self.padded_times(best.start_idx, best.end_idx, config.pad_ms);
                return ResolvedSpan {
                    sentence_idx,
                    start_idx: Some(best.start_idx),
                    end_idx: Some(best.end_idx),
                    start_ms: Some(start_ms),
                    end_ms: Some(end_ms),
                    status: SpanStatus::Warning,
                    score: Some(best.score),
                    method: AlignMethod::Local,
                    warning: Some("warning".to_string()),
                };
            }
        }

        tracing::warn!(
            sentence_idx,
            strict_score = strict_best.as_ref().map(|b| b.score),
            "strict pass missed min/warn threshold, trying relaxed fallback"
        );

        let fallback_window = config.window_tokens + config.fallback_expand_window;
        let (fb_start, fb_end) = self.search_window(self.cursor, fallback_window, &anchors);
        let fallback_params = PassParams {
            elastic_gap: config.fallback_elastic_gap,
            token_ratio_cutoff: config.fallback_token_ratio,
            weights: &config.weights,
        };
        let fallback_candidates = self.generate_candidates(
            &sentence_tokens,
            &anchors,
            fb_start,
            fb_end,
            &fallback_params,
        );
        let fallback_best = Self::best_candidate(fallback_candidates);

        if let Some(best) = &fallback_best {
            if best.score >= config.warn_accept {
                self.cursor = best.end_idx + 1;
                let (start_ms, end_ms) =
                    self.padded_times(best.start_idx, best.end_idx, config.pad_ms);
                return ResolvedSpan {
                    sentence_idx,
                    start_idx: Some(best.start_idx),
                    end_idx: Some(best.end_idx),
                    start_ms: Some(start_ms),
                    end_ms: Some(end_ms),
                    status: SpanStatus::Fallback,
                    score: Some(best.score),
                    method: AlignMethod::Local,
                    warning: Some("fallback".to_string()),
                };
            }
        }

        tracing::warn!(sentence_idx, "no viable span found after fallback pass");

        ResolvedSpan {
            sentence_idx,
            start_idx: None,
            end_idx: None,
            start_ms: None,
            end_ms: None,
            status: SpanStatus::Unaligned,
            score: None,
            method: AlignMethod::Local,
            warning: Some("no_viable_span".to_string()),
        }
    }

    /// Aligns `sentences` in order, returning one [`ResolvedSpan`] per
    /// input sentence. The cursor invariant (§4.4) is preserved across the
    /// whole call: a failure never advances it.
    pub fn align_all(&mut self, sentences: &[(usize, &str)], config: &AlignConfig) -> Vec<ResolvedSpan> {
        sentences
            .iter()
            .map(|(idx, text)| self.align_sentence(*idx, text, config))
            .collect()
    }
}
