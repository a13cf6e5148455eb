use serde::{Deserialize, Serialize};
use specta::Type;

/// A single timestamped word as produced by an ASR transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Type)]
pub struct Word {
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// A sentence to be aligned against the word stream, identified by its
/// 1-based position in the transcript's sentence list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Type)]
pub struct Sentence {
    pub index: usize,
    pub text: String,
}

/// A token carrying its normalized form alongside the original surface
/// text, used throughout anchor selection and scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub surface: String,
    pub normalized: String,
}

impl Token {
    pub fn new(surface: impl Into<String>) -> Self {
        let surface = surface.into();
        let normalized = align_normalize::normalize_token(&surface);
        Self { surface, normalized }
    }
}

/// A high-signal token selected from a sentence to narrow the search
/// window before scoring candidate spans.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub token: String,
    pub weight: f64,
}

/// A candidate [start, end) span of words under consideration for a
/// sentence, along with its composite score and sub-signal breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSpan {
    pub start_idx: usize,
    pub end_idx: usize,
    pub score: f64,
    pub token_sim: f64,
    pub coverage: f64,
    pub gap_penalty: f64,
    pub anchor_bonus: f64,
    pub bigram_bonus: f64,
}

/// How a span ultimately ended up resolved for its sentence, matching the
/// four-value status tag in the data model (`ok`/`warning`/`fallback`/
/// `not_aligned`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
pub enum SpanStatus {
    Ok,
    Warning,
    Fallback,
    Unaligned,
}

/// The final span assigned to a sentence: a word-index range (when backed
/// by the Local Aligner), its padded millisecond times, its resolution
/// method, and any warning raised along the way.
///
/// `start_idx`/`end_idx` are `None` for LLM- and manually-resolved spans
/// (those carry no word-index backing) as well as for totally unresolved
/// sentences; `start_ms`/`end_ms` are `None` only for unresolved sentences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Type)]
pub struct ResolvedSpan {
    pub sentence_idx: usize,
    pub start_idx: Option<usize>,
    pub end_idx: Option<usize>,
    pub start_ms: Option<u64>,
    pub end_ms: Option<u64>,
    pub status: SpanStatus,
    pub score: Option<f64>,
    pub method: AlignMethod,
    pub warning: Option<String>,
}

impl ResolvedSpan {
    pub fn is_resolved(&self) -> bool {
        self.start_ms.is_some() && self.end_ms.is_some()
    }
}

/// Which resolution path produced a [`ResolvedSpan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
pub enum AlignMethod {
    Local,
    Llm,
    Manual,
}

/// A manual override supplied by a caller, pinning a sentence to an
/// explicit millisecond span regardless of what scoring would produce.
/// Applied last, after method resolution; takes precedence over any
/// computed span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Type)]
pub struct ManualAdjustment {
    pub sentence_idx: usize,
    pub start_ms: u64,
    pub end_ms: u64,
}
