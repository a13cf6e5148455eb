//! Hybrid Coordinator / Reporter (§4.5): picks between `local`, `llm`, and
//! `hybrid` method, fans out LLM requests with bounded concurrency, merges
//! LLM results with local fallback, applies manual overrides, and builds
//! the final report.

use std::time::Duration;

use futures_util::{stream, StreamExt};

use crate::aligner::LocalAligner;
use crate::config::{AlignConfig, AlignMethodConfig};
use crate::error::AlignError;
use crate::llm::{LlmAligner, LlmFailure, TranscriptionView};
use crate::report::{AlignmentReport, OutputSpan};
use crate::types::{AlignMethod, ManualAdjustment, ResolvedSpan, Sentence, SpanStatus, Word};

/// Drives a single build from transcription + sentences to resolved spans
/// and a report, optionally delegating some or all sentences to an
/// external `LlmAligner`.
pub struct HybridCoordinator<'a> {
    llm: Option<&'a dyn LlmAligner>,
}

impl<'a> HybridCoordinator<'a> {
    pub fn new(llm: Option<&'a dyn LlmAligner>) -> Self {
        Self { llm }
    }

    /// Runs a full build: validates input, resolves every sentence via the
    /// configured method, applies manual overrides, and returns the
    /// per-sentence output array plus the report.
    pub async fn run(
        &self,
        words: &[Word],
        sentences: &[Sentence],
        config: &AlignConfig,
        manual_overrides: &[ManualAdjustment],
    ) -> Result<(Vec<Option<OutputSpan>>, AlignmentReport), AlignError> {
        validate_input(words, sentences)?;

        let method = self.effective_method(config.method);

        let mut resolved = match method {
            AlignMethodConfig::Local => self.run_local(words, sentences, config),
            AlignMethodConfig::Llm => self.run_llm_only(words, sentences, config).await,
            AlignMethodConfig::Hybrid => self.run_hybrid(words, sentences, config).await,
        };

        for adjustment in manual_overrides {
            apply_manual_override(&mut resolved, adjustment, sentences.len());
        }

        tracing::info!(
            num_sentences = sentences.len(),
            method = ?method,
            "alignment build complete"
        );

        Ok(AlignmentReport::build(&resolved, sentences))
    }

    /// Degrades `llm`/`hybrid` to `local` when no capability was supplied,
    /// per §9's capability-interface design note.
    fn effective_method(&self, requested: AlignMethodConfig) -> AlignMethodConfig {
        if self.llm.is_none() && requested != AlignMethodConfig::Local {
            tracing::warn!(requested = ?requested, "no LlmAligner supplied, degrading to local");
            AlignMethodConfig::Local
        } else {
            requested
        }
    }

    fn run_local(&self, words: &[Word], sentences: &[Sentence], config: &AlignConfig) -> Vec<ResolvedSpan> {
        let mut aligner = LocalAligner::new(words);
        let pairs: Vec<(usize, &str)> = sentences
            .iter()
            .map(|s| (s.index, s.text.as_str()))
            .collect();
        aligner.align_all(&pairs, config)
    }

    async fn run_llm_only(
        &self,
        words: &[Word],
        sentences: &[Sentence],
        config: &AlignConfig,
    ) -> Vec<ResolvedSpan> {
        self.fan_out_llm(words, sentences, config)
            .await
            .into_iter()
            .map(|(sentence, outcome)| resolved_from_llm(sentence, outcome, config))
            .collect()
    }

    async fn run_hybrid(
        &self,
        words: &[Word],
        sentences: &[Sentence],
        config: &AlignConfig,
    ) -> Vec<ResolvedSpan> {
        let llm_outcomes = self.fan_out_llm(words, sentences, config).await;

        let mut failed: Vec<&Sentence> = Vec::new();
        for (sentence, outcome) in &llm_outcomes {
            if outcome.is_err() {
                failed.push(sentence);
            }
        }

        tracing::info!(
            total = sentences.len(),
            llm_failed = failed.len(),
            "hybrid: local fallback scheduled for llm failures"
        );

        let mut local_aligner = LocalAligner::new(words);
        let fallback_pairs: Vec<(usize, &str)> =
            failed.iter().map(|s| (s.index, s.text.as_str())).collect();
        let mut local_results = local_aligner.align_all(&fallback_pairs, config).into_iter();

        llm_outcomes
            .into_iter()
            .map(|(sentence, outcome)| match outcome {
                Ok(llm_span) => resolved_from_llm(sentence, Ok(llm_span), config),
                Err(_) => local_results
                    .next()
                    .expect("one local result per llm failure, in order"),
            })
            .collect()
    }

    /// Runs `align_sentence` for every sentence with bounded concurrency
    /// (`config.llm.max_workers` in flight at once), retrying transport
    /// failures up to `max_retries` times with a fixed delay and enforcing
    /// a per-request timeout, per §5.
    async fn fan_out_llm<'s>(
        &self,
        words: &[Word],
        sentences: &'s [Sentence],
        config: &AlignConfig,
    ) -> Vec<(&'s Sentence, Result<crate::llm::LlmSpan, LlmFailure>)> {
        let Some(llm) = self.llm else {
            return sentences
                .iter()
                .map(|s| (s, Err(LlmFailure::new("no LlmAligner configured"))))
                .collect();
        };

        let view = TranscriptionView::new(words);
        let llm_config = &config.llm;

        let mut results: Vec<(usize, &Sentence, Result<crate::llm::LlmSpan, LlmFailure>)> =
            stream::iter(sentences.iter().enumerate().map(|(i, sentence)| {
                let view = view;
                async move {
                    let outcome =
                        request_with_retry(llm, sentence, view, llm_config.max_retries, llm_config.timeout, llm_config.retry_delay)
                            .await;
                    (i, sentence, outcome)
                }
            }))
            .buffer_unordered(llm_config.max_workers.max(1))
            .collect()
            .await;

        results.sort_by_key(|(i, _, _)| *i);
        results.into_iter().map(|(_, s, r)| (s, r)).collect()
    }
}

/// A single sentence's request against the oracle, retried up to
/// `max_retries` additional times after the first attempt, each attempt
/// bounded by `timeout`, with a fixed `retry_delay` between attempts.
async fn request_with_retry(
    llm: &dyn LlmAligner,
    sentence: &Sentence,
    view: TranscriptionView<'_>,
    max_retries: u32,
    timeout: Duration,
    retry_delay: Duration,
) -> Result<crate::llm::LlmSpan, LlmFailure> {
    let mut last_err = LlmFailure::new("llm request never attempted");
    for attempt in 0..=max_retries {
        match tokio::time::timeout(timeout, llm.align_sentence(sentence, view)).await {
            Ok(Ok(span)) => return Ok(span),
            Ok(Err(err)) => last_err = err,
            Err(_) => last_err = LlmFailure::new(format!("request timed out after {timeout:?}")),
        }
        if attempt < max_retries {
            tracing::warn!(
                sentence_idx = sentence.index,
                attempt,
                "llm request failed, retrying after fixed delay"
            );
            tokio::time::sleep(retry_delay).await;
        }
    }
    last_err
}

fn resolved_from_llm(
    sentence: &Sentence,
    outcome: Result<crate::llm::LlmSpan, LlmFailure>,
    config: &AlignConfig,
) -> ResolvedSpan {
    match outcome {
        Ok(span) => {
            let low_confidence = span.confidence < config.llm.min_confidence;
            ResolvedSpan {
                sentence_idx: sentence.index,
                start_idx: None,
                end_idx: None,
                start_ms: Some(span.start_ms),
                end_ms: Some(span.end_ms),
                status: if low_confidence {
                    SpanStatus::Warning
                } else {
                    SpanStatus::Ok
                },
                score: Some(span.confidence as f64),
                method: AlignMethod::Llm,
                warning: low_confidence.then(|| "low_confidence".to_string()),
            }
        }
        Err(failure) => {
            tracing::warn!(sentence_idx = sentence.index, error = %failure, "llm transport failure");
            ResolvedSpan {
                sentence_idx: sentence.index,
                start_idx: None,
                end_idx: None,
                start_ms: None,
                end_ms: None,
                status: SpanStatus::Unaligned,
                score: None,
                method: AlignMethod::Llm,
                warning: Some("llm_transport_failure".to_string()),
            }
        }
    }
}

fn validate_input(words: &[Word], sentences: &[Sentence]) -> Result<(), AlignError> {
    if sentences.is_empty() {
        return Err(AlignError::InvalidInput("no sentences provided".to_string()));
    }
    if sentences[0].index != 1 {
        return Err(AlignError::InvalidInput(format!(
            "sentence ordinals are 1-based, got {} for the first sentence",
            sentences[0].index
        )));
    }
    for (i, pair) in sentences.windows(2).enumerate() {
        if pair[1].index != pair[0].index + 1 {
            return Err(AlignError::InvalidInput(format!(
                "sentence ordinals must be dense and increasing, got {} then {} at position {i}",
                pair[0].index, pair[1].index
            )));
        }
    }
    for pair in words.windows(2) {
        if pair[1].start_ms < pair[0].start_ms {
            return Err(AlignError::InvalidInput(
                "word array is not monotonically non-decreasing in start time".to_string(),
            ));
        }
    }
    for word in words {
        if word.end_ms < word.start_ms {
            return Err(AlignError::InvalidInput(format!(
                "word {:?} has end_ms < start_ms",
                word.text
            )));
        }
    }
    Ok(())
}

/// Applies one manual override in place. Invalid overrides (bad ordinal,
/// or `start_ms >= end_ms`) are rejected per-sentence, leaving whatever the
/// chosen method already computed untouched, per §7.
fn apply_manual_override(spans: &mut [ResolvedSpan], adjustment: &ManualAdjustment, num_sentences: usize) {
    if adjustment.sentence_idx == 0
        || adjustment.sentence_idx > num_sentences
        || adjustment.start_ms >= adjustment.end_ms
    {
        tracing::warn!(
            sentence_idx = adjustment.sentence_idx,
            "rejecting invalid manual adjustment"
        );
        return;
    }
    let Some(span) = spans
        .iter_mut()
        .find(|s| s.sentence_idx == adjustment.sentence_idx)
    else {
        return;
    };
    span.start_idx = None;
    span.end_idx = None;
    span.start_ms = Some(adjustment.start_ms);
    span.end_ms = Some(adjustment.end_ms);
    span.status = SpanStatus::Ok;
    span.score = Some(1.0);
    span.method = AlignMethod::Manual;
    span.warning = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn word(text: &str, start: u64, end: u64) -> Word {
        Word {
            text: text.to_string(),
            start_ms: start,
            end_ms: end,
            confidence: None,
        }
    }

    fn sentence(idx: usize, text: &str) -> Sentence {
        Sentence {
            index: idx,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn local_only_method_never_touches_llm() {
        let words = vec![
            word("the", 0, 100),
            word("sea", 100, 500),
            word("is", 500, 600),
            word("deep", 600, 900),
        ];
        let sentences = vec![sentence(1, "The sea is deep.")];
        let mut config = AlignConfig::default();
        config.method = AlignMethodConfig::Local;

        let coordinator = HybridCoordinator::new(None);
        let (outputs, report) = coordinator
            .run(&words, &sentences, &config, &[])
            .await
            .unwrap();

        assert_eq!(report.global.aligned, 1);
        assert!(outputs[0].is_some());
        assert_eq!(outputs[0].as_ref().unwrap().method, AlignMethod::Local);
    }

    #[tokio::test]
    async fn hybrid_degrades_to_local_without_llm_capability() {
        let words = vec![
            word("the", 0, 100),
            word("sea", 100, 500),
            word("is", 500, 600),
            word("deep", 600, 900),
        ];
        let sentences = vec![sentence(1, "The sea is deep.")];
        let config = AlignConfig::default(); // default method is Hybrid

        let coordinator = HybridCoordinator::new(None);
        let (outputs, _report) = coordinator
            .run(&words, &sentences, &config, &[])
            .await
            .unwrap();

        assert_eq!(outputs[0].as_ref().unwrap().method, AlignMethod::Local);
    }

    struct AlwaysSucceeds {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LlmAligner for AlwaysSucceeds {
        async fn align_sentence(
            &self,
            sentence: &Sentence,
            _transcription: TranscriptionView<'_>,
        ) -> Result<crate::llm::LlmSpan, LlmFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(crate::llm::LlmSpan {
                start_ms: sentence.index as u64 * 1000,
                end_ms: sentence.index as u64 * 1000 + 500,
                confidence: 0.95,
            })
        }
    }

    #[tokio::test]
    async fn llm_method_uses_oracle_for_every_sentence() {
        let words = vec![word("hello", 0, 100)];
        let sentences = vec![sentence(1, "Hello."), sentence(2, "World.")];
        let mut config = AlignConfig::default();
        config.method = AlignMethodConfig::Llm;

        let llm = AlwaysSucceeds {
            calls: AtomicUsize::new(0),
        };
        let coordinator = HybridCoordinator::new(Some(&llm));
        let (outputs, report) = coordinator
            .run(&words, &sentences, &config, &[])
            .await
            .unwrap();

        assert_eq!(llm.calls.load(Ordering::SeqCst), 2);
        assert_eq!(report.global.aligned, 2);
        assert_eq!(outputs[0].as_ref().unwrap().method, AlignMethod::Llm);
    }

    struct FailsSentenceTwo;

    #[async_trait]
    impl LlmAligner for FailsSentenceTwo {
        async fn align_sentence(
            &self,
            sentence: &Sentence,
            _transcription: TranscriptionView<'_>,
        ) -> Result<crate::llm::LlmSpan, LlmFailure> {
            if sentence.index == 2 {
                Err(LlmFailure::new("simulated transport failure"))
            } else {
                Ok(crate::llm::LlmSpan {
                    start_ms: 0,
                    end_ms: 1000,
                    confidence: 0.97,
                })
            }
        }
    }

    #[tokio::test]
    async fn hybrid_falls_back_locally_for_llm_failures_only() {
        let words = vec![
            word("the", 0, 100),
            word("sea", 100, 500),
            word("is", 500, 600),
            word("deep", 600, 900),
        ];
        let sentences = vec![sentence(1, "Anything."), sentence(2, "The sea is deep.")];
        let mut config = AlignConfig::default();
        config.method = AlignMethodConfig::Hybrid;
        config.llm.max_retries = 0;
        config.llm.retry_delay = Duration::from_millis(1);

        let llm = FailsSentenceTwo;
        let coordinator = HybridCoordinator::new(Some(&llm));
        let (outputs, _report) = coordinator
            .run(&words, &sentences, &config, &[])
            .await
            .unwrap();

        assert_eq!(outputs[0].as_ref().unwrap().method, AlignMethod::Llm);
        let second = outputs[1].as_ref().unwrap();
        assert_eq!(second.method, AlignMethod::Local);
        assert_eq!(second.start_ms, 0);
        assert_eq!(second.end_ms, 1000);
    }

    #[tokio::test]
    async fn retries_happen_up_to_max_retries() {
        let words = vec![word("hello", 0, 100)];
        let sentences = vec![sentence(1, "Hello.")];
        let mut config = AlignConfig::default();
        config.method = AlignMethodConfig::Llm;
        config.llm.max_retries = 2;
        config.llm.retry_delay = Duration::from_millis(1);

        let attempts = Mutex::new(0usize);
        struct CountingFailure<'a>(&'a Mutex<usize>);
        #[async_trait]
        impl<'a> LlmAligner for CountingFailure<'a> {
            async fn align_sentence(
                &self,
                _sentence: &Sentence,
                _transcription: TranscriptionView<'_>,
            ) -> Result<crate::llm::LlmSpan, LlmFailure> {
                *self.0.lock().unwrap() += 1;
                Err(LlmFailure::new("down"))
            }
        }
        let llm = CountingFailure(&attempts);
        let coordinator = HybridCoordinator::new(Some(&llm));
        let (outputs, report) = coordinator
            .run(&words, &sentences, &config, &[])
            .await
            .unwrap();

        assert_eq!(*attempts.lock().unwrap(), 3); // 1 initial + 2 retries
        assert!(outputs[0].is_none());
        assert_eq!(report.global.unaligned, 1);
    }

    #[tokio::test]
    async fn manual_override_takes_precedence() {
        let words = vec![
            word("the", 0, 100),
            word("sea", 100, 500),
            word("is", 500, 600),
            word("deep", 600, 900),
        ];
        let sentences = vec![sentence(1, "The sea is deep.")];
        let mut config = AlignConfig::default();
        config.method = AlignMethodConfig::Local;

        let overrides = vec![ManualAdjustment {
            sentence_idx: 1,
            start_ms: 50,
            end_ms: 80,
        }];

        let coordinator = HybridCoordinator::new(None);
        let (outputs, _report) = coordinator
            .run(&words, &sentences, &config, &overrides)
            .await
            .unwrap();

        let span = outputs[0].as_ref().unwrap();
        assert_eq!(span.start_ms, 50);
        assert_eq!(span.end_ms, 80);
        assert_eq!(span.method, AlignMethod::Manual);
        assert_eq!(span.quality.score, 1.0);
    }

    #[tokio::test]
    async fn invalid_manual_override_is_rejected_per_sentence() {
        let words = vec![
            word("the", 0, 100),
            word("sea", 100, 500),
            word("is", 500, 600),
            word("deep", 600, 900),
        ];
        let sentences = vec![sentence(1, "The sea is deep.")];
        let config = AlignConfig::default();

        let overrides = vec![ManualAdjustment {
            sentence_idx: 1,
            start_ms: 100,
            end_ms: 50, // start >= end, invalid
        }];

        let coordinator = HybridCoordinator::new(None);
        let (outputs, _report) = coordinator
            .run(&words, &sentences, &config, &overrides)
            .await
            .unwrap();

        // The computed local span stays in place rather than being overwritten.
        assert!(outputs[0].is_some());
        assert_ne!(outputs[0].as_ref().unwrap().method, AlignMethod::Manual);
    }

    #[tokio::test]
    async fn empty_sentence_list_aborts_build() {
        let words = vec![word("hi", 0, 100)];
        let config = AlignConfig::default();
        let coordinator = HybridCoordinator::new(None);
        let result = coordinator.run(&words, &[], &config, &[]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn non_monotonic_word_array_is_invalid_input() {
        let words = vec![word("b", 500, 600), word("a", 0, 100)];
        let sentences = vec![sentence(1, "a.")];
        let config = AlignConfig::default();
        let coordinator = HybridCoordinator::new(None);
        let result = coordinator.run(&words, &sentences, &config, &[]).await;
        assert!(result.is_err());
    }
}
