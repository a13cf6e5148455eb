use std::time::Duration;

/// Which resolution path the [`crate::coordinator`] should drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignMethodConfig {
    Local,
    Llm,
    #[default]
    Hybrid,
}

/// Weights for the five composite-score sub-signals (`score = 0.50*token_sim
/// + 0.25*coverage - 0.20*gap_penalty + 0.08*anchor_bonus + 0.05*bigram_bonus`
/// by default).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub token_sim: f64,
    pub coverage: f64,
    pub gap_penalty: f64,
    pub anchor_bonus: f64,
    pub bigram_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            token_sim: 0.50,
            coverage: 0.25,
            gap_penalty: 0.20,
            anchor_bonus: 0.08,
            bigram_bonus: 0.05,
        }
    }
}

/// Bounded-concurrency knobs for the Hybrid Coordinator's LLM fan-out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LlmConfig {
    pub max_workers: usize,
    pub max_retries: u32,
    pub timeout: Duration,
    /// Fixed delay between retry attempts. Spec calls for a fixed backoff
    /// (not exponential); the value itself is not pinned by spec, so this
    /// mirrors the source system's `retry_delay` config attribute.
    pub retry_delay: Duration,
    /// Confidence below which an otherwise-successful LLM span is still
    /// accepted but recorded as a warning.
    pub min_confidence: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            max_workers: 5,
            max_retries: 3,
            timeout: Duration::from_secs(30),
            retry_delay: Duration::from_millis(500),
            min_confidence: 0.9,
        }
    }
}

/// All tunables for a single alignment build. Every field has a default
/// matching the values this pipeline has been tuned against; callers
/// override only what they need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignConfig {
    pub window_tokens: usize,
    pub elastic_gap: usize,
    pub min_accept: f64,
    pub warn_accept: f64,
    pub token_ratio_cutoff: u32,
    pub fallback_expand_window: usize,
    pub fallback_elastic_gap: usize,
    pub fallback_token_ratio: u32,
    pub pad_ms: u64,
    pub max_anchors: usize,
    pub method: AlignMethodConfig,
    pub weights: ScoringWeights,
    pub llm: LlmConfig,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            window_tokens: 4000,
            elastic_gap: 10,
            min_accept: 0.85,
            warn_accept: 0.78,
            token_ratio_cutoff: 92,
            fallback_expand_window: 1000,
            fallback_elastic_gap: 18,
            fallback_token_ratio: 88,
            pad_ms: 100,
            max_anchors: 3,
            method: AlignMethodConfig::Hybrid,
            weights: ScoringWeights::default(),
            llm: LlmConfig::default(),
        }
    }
}

/// Words inspected from the start of a fallback-narrowed window when
/// looking for an anchor occurrence. Hardcoded rather than configurable:
/// the system this pipeline replaces carries it as an undocumented literal
/// with no corresponding config field, and this implementation preserves
/// that as-is rather than inventing a knob the behavior never exposed.
pub const ANCHOR_NARROWING_PREFIX: usize = 500;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let cfg = AlignConfig::default();
        assert_eq!(cfg.window_tokens, 4000);
        assert_eq!(cfg.elastic_gap, 10);
        assert_eq!(cfg.min_accept, 0.85);
        assert_eq!(cfg.warn_accept, 0.78);
        assert_eq!(cfg.token_ratio_cutoff, 92);
        assert_eq!(cfg.fallback_expand_window, 1000);
        assert_eq!(cfg.fallback_elastic_gap, 18);
        assert_eq!(cfg.fallback_token_ratio, 88);
        assert_eq!(cfg.pad_ms, 100);
        assert_eq!(cfg.max_anchors, 3);
        assert_eq!(cfg.method, AlignMethodConfig::Hybrid);
        assert_eq!(cfg.llm.max_workers, 5);
        assert_eq!(cfg.llm.max_retries, 3);
        assert_eq!(cfg.llm.timeout, Duration::from_secs(30));
        assert_eq!(cfg.llm.retry_delay, Duration::from_millis(500));
        assert_eq!(cfg.llm.min_confidence, 0.9);
    }

    #[test]
    fn default_weights_sum_matches_spec_formula() {
        let w = ScoringWeights::default();
        assert_eq!(w.token_sim, 0.50);
        assert_eq!(w.coverage, 0.25);
        assert_eq!(w.gap_penalty, 0.20);
        assert_eq!(w.anchor_bonus, 0.08);
        assert_eq!(w.bigram_bonus, 0.05);
    }
}
