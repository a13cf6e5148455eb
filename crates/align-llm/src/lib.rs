//! A concrete [`align_core::LlmAligner`] backed by an OpenAI-compatible
//! chat completions endpoint. Issues one request per call; the coordinator
//! owns retry, timeout, and concurrency policy (per `align_core::llm`'s
//! trait doc comment), so this implementation stays a thin HTTP client.

use align_core::{LlmAligner, LlmFailure, LlmSpan, Sentence, TranscriptionView};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.x.ai/v1";
const DEFAULT_MODEL: &str = "grok-4-fast";
const MAX_RESPONSE_TOKENS: u32 = 200;
const TEMPERATURE: f32 = 0.1;

const SYSTEM_PROMPT: &str = "You are a precise timestamp alignment assistant. Given a sentence and a \
transcription with word-level timestamps, you determine the exact start and end times for that \
sentence in milliseconds. Provide a confidence score (0.0 to 1.0) for your alignment.";

/// Configuration for the HTTP-backed aligner: endpoint, model, and
/// credentials. Defaults point at xAI's Grok endpoint, matching the system
/// this pipeline replaces.
#[derive(Debug, Clone)]
pub struct HttpLlmConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

impl HttpLlmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }
}

/// An [`LlmAligner`] that asks an OpenAI-compatible chat completions
/// endpoint to locate a sentence inside a compact JSON transcription.
pub struct HttpLlmAligner {
    client: reqwest::Client,
    config: HttpLlmConfig,
}

impl HttpLlmAligner {
    pub fn new(config: HttpLlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn with_client(client: reqwest::Client, config: HttpLlmConfig) -> Self {
        Self { client, config }
    }
}

#[derive(Serialize)]
struct CompactWord<'a> {
    text: &'a str,
    start: u64,
    end: u64,
}

#[derive(Serialize)]
struct CompactTranscription<'a> {
    words: Vec<CompactWord<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: serde_json::Value,
}

fn alignment_response_schema() -> serde_json::Value {
    serde_json::json!({
        "name": "alignment_response",
        "schema": {
            "type": "object",
            "properties": {
                "start_ms": {"type": "integer", "minimum": 0},
                "end_ms": {"type": "integer", "minimum": 0},
                "confidence": {"type": "number", "minimum": 0.0, "maximum": 1.0}
            },
            "required": ["start_ms", "end_ms", "confidence"],
            "additionalProperties": false
        }
    })
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct AlignmentResponse {
    start_ms: u64,
    end_ms: u64,
    confidence: f32,
}

fn build_prompt(transcription_json: &str, sentence_text: &str) -> String {
    format!(
        "Given this transcription with word-level timestamps (in milliseconds):\n\n\
         {transcription_json}\n\n\
         Task: Find the exact start and end timestamps for this sentence:\n\"{sentence_text}\"\n\n\
         Instructions:\n\
         1. Match the sentence to the transcription, accounting for minor differences in punctuation, contractions, or formatting\n\
         2. The sentence may not be word-for-word identical to the transcription (handle paraphrasing)\n\
         3. Identify the first word of the sentence and use its start timestamp\n\
         4. Identify the last word of the sentence and use its end timestamp\n\
         5. Provide a confidence score (0.0 to 1.0) based on how well the sentence matches the transcription:\n\
         \u{2013} 1.0: Perfect match\n\
         \u{2013} 0.9-0.99: Excellent match with minor differences\n\
         \u{2013} 0.8-0.89: Good match with some paraphrasing\n\
         \u{2013} Below 0.8: Uncertain match"
    )
}

#[async_trait]
impl LlmAligner for HttpLlmAligner {
    async fn align_sentence(
        &self,
        sentence: &Sentence,
        transcription: TranscriptionView<'_>,
    ) -> Result<LlmSpan, LlmFailure> {
        let compact = CompactTranscription {
            words: transcription
                .words
                .iter()
                .map(|w| CompactWord {
                    text: &w.text,
                    start: w.start_ms,
                    end: w.end_ms,
                })
                .collect(),
        };
        let transcription_json =
            serde_json::to_string(&compact).map_err(|e| LlmFailure::new(e.to_string()))?;
        let prompt = build_prompt(&transcription_json, &sentence.text);

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_RESPONSE_TOKENS,
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: alignment_response_schema(),
            },
        };

        tracing::debug!(sentence_idx = sentence.index, model = %self.config.model, "sending llm alignment request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmFailure::new(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmFailure::new(format!(
                "llm endpoint returned {status}: {body}"
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmFailure::new(format!("failed to parse response: {e}")))?;

        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| LlmFailure::new("llm response had no choices"))?;

        let alignment: AlignmentResponse =
            serde_json::from_str(content).map_err(|e| LlmFailure::new(format!("malformed alignment json: {e}")))?;

        if alignment.end_ms < alignment.start_ms {
            return Err(LlmFailure::new("llm returned end_ms before start_ms"));
        }

        Ok(LlmSpan {
            start_ms: alignment.start_ms,
            end_ms: alignment.end_ms,
            confidence: alignment.confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_includes_sentence_and_transcription() {
        let prompt = build_prompt("{\"words\":[]}", "Hello world.");
        assert!(prompt.contains("Hello world."));
        assert!(prompt.contains("{\"words\":[]}"));
    }

    #[test]
    fn schema_requires_all_three_fields() {
        let schema = alignment_response_schema();
        let required = schema["schema"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 3);
    }
}
