use thiserror::Error;

/// Errors surfaced by the alignment core.
///
/// Most variants describe a single sentence's failure to resolve and are
/// captured in the [`crate::AlignmentReport`] rather than aborting a build;
/// only [`AlignError::InvalidInput`] and an out-of-range manual adjustment
/// stop the whole build.
#[derive(Debug, Error)]
pub enum AlignError {
    #[error("sentence {sentence_idx} is empty after normalization")]
    EmptySentence { sentence_idx: usize },

    #[error("no viable span found for sentence {sentence_idx} within the search window")]
    NoViableSpan { sentence_idx: usize },

    #[error("llm transport failed for sentence {sentence_idx}: {reason}")]
    LlmTransportFailure { sentence_idx: usize, reason: String },

    #[error("llm returned low-confidence alignment for sentence {sentence_idx} (confidence {confidence:.2})")]
    LlmLowConfidence { sentence_idx: usize, confidence: f32 },

    #[error(
        "manual adjustment for sentence {sentence_idx} is invalid: start_ms={start_ms} end_ms={end_ms} (num_sentences={num_sentences})"
    )]
    InvalidManualAdjustment {
        sentence_idx: usize,
        start_ms: u64,
        end_ms: u64,
        num_sentences: usize,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
