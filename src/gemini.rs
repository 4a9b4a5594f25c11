//! Gemini API client for grounded text generation.
//!
//! Talks to the native Gemini REST API (`generateContent`) with the
//! `google_search` tool enabled, so responses come back with grounding
//! citations alongside the text. Auth is a `?key=` query parameter.

use crate::metrics::GroundingChunk;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Base URL for the Gemini REST API.
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!("keyscope/", env!("CARGO_PKG_VERSION"));

/// Default timeout for generation requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to reach the Gemini API: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Gemini API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
    #[error("generation blocked: {reason}")]
    Blocked { reason: String },
    #[error("could not decode Gemini response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Text plus citation metadata returned from one generation call.
#[derive(Debug, Clone, Default)]
pub struct ModelReply {
    pub text: String,
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// One round trip to a generative text model.
///
/// The orchestrator depends on this seam rather than on a concrete client,
/// which keeps it testable without a network.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate(&self, prompt: &str, web_search: bool) -> Result<ModelReply, ModelError>;
}

/// Gemini REST API client.
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, ModelError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            API_BASE, self.model, self.api_key
        )
    }

    fn build_request_body(prompt: &str, web_search: bool) -> Value {
        let mut body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });
        if web_search {
            body["tools"] = serde_json::json!([{ "google_search": {} }]);
        }
        body
    }

    /// Parse a `generateContent` response body into a [`ModelReply`].
    ///
    /// Text parts of the first candidate are concatenated; grounding chunks
    /// default to empty when the metadata is missing. A prompt rejected by
    /// content filtering carries `promptFeedback.blockReason` and no
    /// candidates, which surfaces as [`ModelError::Blocked`].
    fn parse_reply(body: &Value) -> Result<ModelReply, ModelError> {
        let response: GenerateContentResponse = serde_json::from_value(body.clone())?;

        let candidate = match response.candidates.into_iter().next() {
            Some(candidate) => candidate,
            None => {
                if let Some(reason) = response
                    .prompt_feedback
                    .and_then(|feedback| feedback.block_reason)
                {
                    return Err(ModelError::Blocked { reason });
                }
                return Ok(ModelReply::default());
            }
        };

        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        let grounding_chunks = candidate
            .grounding_metadata
            .map(|metadata| metadata.grounding_chunks)
            .unwrap_or_default();

        Ok(ModelReply {
            text,
            grounding_chunks,
        })
    }

    /// Pull a human-readable message out of an error response body.
    fn error_message(body_text: &str) -> String {
        serde_json::from_str::<Value>(body_text)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| body_text.to_string())
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn generate(&self, prompt: &str, web_search: bool) -> Result<ModelReply, ModelError> {
        let body = Self::build_request_body(prompt, web_search);
        let response = self
            .http
            .post(self.endpoint_url())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            return Err(ModelError::Api {
                status: status.as_u16(),
                message: Self::error_message(&body_text),
            });
        }

        let body_json: Value = serde_json::from_str(&body_text)?;
        Self::parse_reply(&body_json)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}
