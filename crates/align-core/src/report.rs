//! The build-level output: one [`OutputSpan`] slot per sentence plus an
//! [`AlignmentReport`] summarizing counters and non-`ok` detail, matching
//! the wire shape in §6.

use serde::{Deserialize, Serialize};
use specta::Type;

use crate::types::{AlignMethod, ResolvedSpan, Sentence, SpanStatus};

/// Human-facing quality summary attached to every resolved span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Type)]
pub struct Quality {
    pub score: f64,
    pub note: Option<String>,
}

/// The external, time-level span for a sentence (named `ResolvedSpan` in
/// the spec's own glossary; kept as a distinct type here — `ResolvedSpan`
/// in this crate already names the internal index-level resolution, and
/// renaming it would ripple through the Local Aligner's tested internals
/// for no behavioral gain — see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Type)]
pub struct OutputSpan {
    pub start_ms: u64,
    pub end_ms: u64,
    pub quality: Quality,
    pub status: SpanStatus,
    pub method: AlignMethod,
}

/// Word-index span, surfaced in report details for aligned-by-index spans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Type)]
pub struct SpanIndices {
    pub start_idx: usize,
    pub end_idx: usize,
}

/// One entry per non-`ok` sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Type)]
pub struct ReportDetail {
    pub idx: usize,
    pub text: String,
    pub status: String,
    pub score: Option<f64>,
    pub reason: String,
    pub method: AlignMethod,
    pub span_indices: Option<SpanIndices>,
}

/// Per-method span counts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Type)]
pub struct MethodCounts {
    pub local: usize,
    pub llm: usize,
    pub manual: usize,
}

/// Global counters for a completed build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Type)]
pub struct GlobalCounters {
    pub num_sentences: usize,
    pub aligned: usize,
    pub unaligned: usize,
    pub warnings: usize,
    pub methods: MethodCounts,
}

/// The report produced once per build: global counters plus per-sentence
/// detail for every non-`ok` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Type)]
pub struct AlignmentReport {
    pub global: GlobalCounters,
    pub details: Vec<ReportDetail>,
}

const TEXT_TRUNCATE_CHARS: usize = 120;

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

/// Maps a resolved span's (status, warning-tag) pair to the report's
/// detail status string and human-readable reason, per §4.5's mapping
/// from the source system's literal note strings.
fn detail_status_and_reason(span: &ResolvedSpan) -> Option<(&'static str, &'static str)> {
    match span.status {
        SpanStatus::Ok => None,
        SpanStatus::Warning => Some(("warning", "acceptable but low score")),
        SpanStatus::Fallback => Some(("fallback", "found with expanded search")),
        SpanStatus::Unaligned => {
            if span.warning.as_deref() == Some("empty") {
                Some(("empty", "no tokens after normalization"))
            } else {
                Some(("not_aligned", "no viable span found"))
            }
        }
    }
}

impl AlignmentReport {
    /// Builds the report and the per-sentence output array from the final
    /// (post-merge, post-manual-override) resolved spans.
    pub fn build(spans: &[ResolvedSpan], sentences: &[Sentence]) -> (Vec<Option<OutputSpan>>, Self) {
        let num_sentences = spans.len();
        let mut aligned = 0usize;
        let mut unaligned = 0usize;
        let mut warnings = 0usize;
        let mut methods = MethodCounts::default();
        let mut outputs = Vec::with_capacity(num_sentences);
        let mut details = Vec::new();

        for span in spans {
            match span.status {
                SpanStatus::Ok => aligned += 1,
                SpanStatus::Warning => {
                    aligned += 1;
                    warnings += 1;
                }
                SpanStatus::Fallback => {
                    // Both counters increment together for a fallback span:
                    // the behavior this pipeline preserves from the system
                    // it replaces (see DESIGN.md Open Question).
                    aligned += 1;
                    warnings += 1;
                }
                SpanStatus::Unaligned => unaligned += 1,
            }
            match span.method {
                AlignMethod::Local => methods.local += 1,
                AlignMethod::Llm => methods.llm += 1,
                AlignMethod::Manual => methods.manual += 1,
            }

            let output = match (span.start_ms, span.end_ms) {
                (Some(start_ms), Some(end_ms)) => Some(OutputSpan {
                    start_ms,
                    end_ms,
                    quality: Quality {
                        score: span.score.unwrap_or(0.0),
                        note: detail_status_and_reason(span).map(|(_, reason)| reason.to_string()),
                    },
                    status: span.status,
                    method: span.method,
                }),
                _ => None,
            };
            outputs.push(output);

            if let Some((status, reason)) = detail_status_and_reason(span) {
                let text = sentences
                    .get(span.sentence_idx.saturating_sub(1))
                    .map(|s| s.text.as_str())
                    .unwrap_or("");
                details.push(ReportDetail {
                    idx: span.sentence_idx,
                    text: truncate(text, TEXT_TRUNCATE_CHARS),
                    status: status.to_string(),
                    score: span.score,
                    reason: reason.to_string(),
                    method: span.method,
                    span_indices: match (span.start_idx, span.end_idx) {
                        (Some(start_idx), Some(end_idx)) => {
                            Some(SpanIndices { start_idx, end_idx })
                        }
                        _ => None,
                    },
                });
            }
        }

        let report = Self {
            global: GlobalCounters {
                num_sentences,
                aligned,
                unaligned,
                warnings,
                methods,
            },
            details,
        };

        (outputs, report)
    }
}
