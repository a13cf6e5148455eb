//! Anchor selection, span scoring, local alignment, and hybrid
//! coordination for sentence-to-word-timestamp alignment.

mod aligner;
mod anchors;
mod config;
mod coordinator;
mod error;
mod input;
mod llm;
mod report;
mod scorer;
mod types;

pub use aligner::LocalAligner;
pub use config::{AlignConfig, AlignMethodConfig, LlmConfig, ScoringWeights, ANCHOR_NARROWING_PREFIX};
pub use coordinator::HybridCoordinator;
pub use error::AlignError;
pub use input::{parse_transcription, Transcription, TranscriptionWord};
pub use llm::{LlmAligner, LlmFailure, LlmSpan, TranscriptionView};
pub use report::{AlignmentReport, GlobalCounters, MethodCounts, OutputSpan, Quality, ReportDetail, SpanIndices};
pub use types::{
    AlignMethod, Anchor, CandidateSpan, ManualAdjustment, ResolvedSpan, Sentence, SpanStatus, Token, Word,
};
