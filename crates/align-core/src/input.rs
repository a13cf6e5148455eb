//! The wire-level transcription envelope (§6): `{ "words": [...],
//! "language_code"?, "id"? }`. This is the dynamic JSON boundary `SPEC_FULL.md`
//! §9 calls out for modeling as explicit typed records rather than a
//! freeform map, so a malformed or incomplete payload is rejected with
//! `AlignError::InvalidInput` at the boundary instead of surfacing as a
//! confusing failure deep inside the aligner.

use serde::Deserialize;
use specta::Type;

use crate::error::AlignError;
use crate::types::Word;

/// A single word as it appears on the wire: `start`/`end` (not
/// `start_ms`/`end_ms`, the internal [`Word`] field names) per §6.
#[derive(Debug, Clone, Deserialize, Type)]
pub struct TranscriptionWord {
    pub text: String,
    pub start: u64,
    pub end: u64,
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl From<TranscriptionWord> for Word {
    fn from(w: TranscriptionWord) -> Self {
        Word {
            text: w.text,
            start_ms: w.start,
            end_ms: w.end,
            confidence: w.confidence,
        }
    }
}

/// The full transcription input object. `language_code` and `id` are
/// optional, so both documented dialects (with and without
/// `language_code`) deserialize identically.
#[derive(Debug, Clone, Deserialize, Type)]
pub struct Transcription {
    pub words: Vec<TranscriptionWord>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl Transcription {
    /// Converts the wire envelope into the internal word stream, dropping
    /// `language_code`/`id` (the aligner is language-agnostic by design,
    /// per the Non-goals).
    pub fn into_words(self) -> Vec<Word> {
        self.words.into_iter().map(Word::from).collect()
    }
}

/// Parses a transcription JSON payload into the internal word stream.
/// Any malformed shape (missing `text`/`start`/`end`, wrong types, not an
/// object at all) surfaces as `AlignError::InvalidInput` rather than
/// panicking or silently dropping words.
pub fn parse_transcription(json: &str) -> Result<Vec<Word>, AlignError> {
    let transcription: Transcription = serde_json::from_str(json)
        .map_err(|e| AlignError::InvalidInput(format!("malformed transcription input: {e}")))?;
    Ok(transcription.into_words())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dialect_with_language_code() {
        let json = r#"{
            "words": [{"text": "hi", "start": 0, "end": 100}],
            "language_code": "en",
            "id": "abc"
        }"#;
        let words = parse_transcription(json).unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "hi");
        assert_eq!(words[0].start_ms, 0);
        assert_eq!(words[0].end_ms, 100);
    }

    #[test]
    fn parses_dialect_without_language_code() {
        let json = r#"{"words": [{"text": "hi", "start": 0, "end": 100}]}"#;
        let words = parse_transcription(json).unwrap();
        assert_eq!(words.len(), 1);
    }

    #[test]
    fn carries_optional_confidence() {
        let json = r#"{"words": [{"text": "hi", "start": 0, "end": 100, "confidence": 0.92}]}"#;
        let words = parse_transcription(json).unwrap();
        assert_eq!(words[0].confidence, Some(0.92));
    }

    #[test]
    fn missing_required_field_is_invalid_input() {
        let json = r#"{"words": [{"text": "hi", "start": 0}]}"#;
        let err = parse_transcription(json).unwrap_err();
        assert!(matches!(err, AlignError::InvalidInput(_)));
    }

    #[test]
    fn missing_words_array_is_invalid_input() {
        let json = r#"{"language_code": "en"}"#;
        let err = parse_transcription(json).unwrap_err();
        assert!(matches!(err, AlignError::InvalidInput(_)));
    }

    #[test]
    fn not_an_object_is_invalid_input() {
        let err = parse_transcription("[]").unwrap_err();
        assert!(matches!(err, AlignError::InvalidInput(_)));
    }
}
