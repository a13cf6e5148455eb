//! The capability interface the Hybrid Coordinator talks to when it needs
//! an external timestamp oracle. `align-core` only depends on this trait;
//! a concrete HTTP-backed implementation lives in the separate `align-llm`
//! crate so the deterministic, synchronous local matcher never pulls in a
//! network stack.

use async_trait::async_trait;

use crate::types::{Sentence, Word};

/// A read-only view of the transcription handed to every LLM worker.
/// Workers share nothing beyond this slice (§5).
#[derive(Debug, Clone, Copy)]
pub struct TranscriptionView<'a> {
    pub words: &'a [Word],
}

impl<'a> TranscriptionView<'a> {
    pub fn new(words: &'a [Word]) -> Self {
        Self { words }
    }
}

/// A single sentence's alignment as returned by the external oracle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LlmSpan {
    pub start_ms: u64,
    pub end_ms: u64,
    pub confidence: f32,
}

/// Why a single LLM request failed. Transport failures are retried by the
/// coordinator up to `max_retries`; the aligner never inspects this beyond
/// deciding whether to fall back.
#[derive(Debug, Clone)]
pub struct LlmFailure {
    pub reason: String,
}

impl LlmFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for LlmFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for LlmFailure {}

/// External oracle capability: given a sentence and a read-only view of the
/// transcription, return its millisecond span and confidence, or a failure.
///
/// Implementations should attempt exactly one request per call — retry and
/// timeout policy is owned by the coordinator (§5), not the implementation,
/// so every attempt is independently retryable and cancellable.
#[async_trait]
pub trait LlmAligner: Send + Sync {
    async fn align_sentence(
        &self,
        sentence: &Sentence,
        transcription: TranscriptionView<'_>,
    ) -> Result<LlmSpan, LlmFailure>;
}
