//! Analysis orchestration: prompt → model call → extraction → result.
//!
//! Extraction problems never abort an analysis; they degrade to an empty
//! metrics table and a placeholder summary. Only configuration and
//! provider-level problems surface as errors.

use crate::config::{Config, ConfigError};
use crate::extract::{extract_metrics, split_response, Extraction, FALLBACK_SUMMARY};
use crate::gemini::{GeminiClient, ModelError, TextModel};
use crate::metrics::AnalysisResult;
use crate::prompt::{build_prompt, split_keywords};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("keywords and location must not be empty")]
    EmptyInput,
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Request blocked by safety filters. Try less sensitive keywords.")]
    SafetyBlocked,
    #[error("The AI model returned no content.")]
    EmptyResponse,
    #[error("Analysis failed: {0}")]
    Provider(String),
}

/// Run one keyword analysis against the given model.
///
/// `keywords` accepts comma- and/or newline-separated tokens. Each call is
/// independent and stateless: one request, one response, no retries.
pub async fn analyze(
    model: &dyn TextModel,
    keywords: &str,
    location: &str,
    website: Option<&str>,
) -> Result<AnalysisResult, AnalysisError> {
    if keywords.trim().is_empty() || location.trim().is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    let batch = split_keywords(keywords);
    if batch.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let prompt = build_prompt(&batch, location, website);
    let reply = model
        .generate(&prompt.text, prompt.web_search)
        .await
        .map_err(map_model_error)?;

    let parts = split_response(&reply.text);
    let metrics = match extract_metrics(&parts.json_candidate) {
        Extraction::Found(metrics) => metrics,
        Extraction::Absent => {
            // No narrative and no payload means the provider gave us nothing
            // usable; an extraction miss on real text is a normal outcome.
            if reply.text.is_empty() {
                return Err(AnalysisError::EmptyResponse);
            }
            Vec::new()
        }
    };

    let summary = if parts.summary.is_empty() {
        FALLBACK_SUMMARY.to_string()
    } else {
        parts.summary
    };

    Ok(AnalysisResult {
        metrics,
        summary,
        grounding_chunks: reply.grounding_chunks,
    })
}

/// Build a Gemini client from config and run one analysis.
///
/// A missing credential is reported here, before any network attempt.
pub async fn analyze_with_config(
    config: &Config,
    keywords: &str,
    location: &str,
    website: Option<&str>,
) -> Result<AnalysisResult, AnalysisError> {
    let api_key = config.api_key()?;
    let client = GeminiClient::new(api_key, &config.analysis.model).map_err(map_model_error)?;
    analyze(&client, keywords, location, website).await
}

fn map_model_error(err: ModelError) -> AnalysisError {
    let message = err.to_string();
    if message.to_lowercase().contains("safety") {
        AnalysisError::SafetyBlocked
    } else {
        AnalysisError::Provider(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::ModelReply;
    use crate::metrics::{Competition, GroundingChunk, WebSource};
    use crate::prompt::JSON_SEPARATOR;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Queue-backed fake model for exercising the orchestrator offline.
    #[derive(Default)]
    struct MockModel {
        replies: Mutex<VecDeque<Result<ModelReply, ModelError>>>,
    }

    impl MockModel {
        fn with_text(text: &str) -> Self {
            let mock = MockModel::default();
            mock.push(Ok(ModelReply {
                text: text.to_string(),
                grounding_chunks: Vec::new(),
            }));
            mock
        }

        fn push(&self, reply: Result<ModelReply, ModelError>) {
            self.replies.lock().unwrap().push_back(reply);
        }
    }

    #[async_trait]
    impl TextModel for MockModel {
        async fn generate(&self, _: &str, _: bool) -> Result<ModelReply, ModelError> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("no mock reply queued")
        }
    }

    fn well_formed_response() -> String {
        format!(
            r#"## Market Insights
The plant-based niche in New York shows strong momentum.
{}
[
  {{ "keyword": "vegan restaurants", "searchVolume": "12,500", "competition": "High" }},
  {{ "keyword": "plant based diet", "searchVolume": "1k-10k", "competition": "Medium" }}
]"#,
            JSON_SEPARATOR
        )
    }

    #[tokio::test]
    async fn well_formed_response_yields_full_result() {
        let mock = MockModel::default();
        mock.push(Ok(ModelReply {
            text: well_formed_response(),
            grounding_chunks: vec![GroundingChunk {
                web: Some(WebSource {
                    uri: Some("https://example.com".to_string()),
                    title: Some("Example".to_string()),
                }),
            }],
        }));

        let result = analyze(
            &mock,
            "vegan restaurants, plant based diet",
            "New York, NY",
            None,
        )
        .await
        .unwrap();

        assert_eq!(result.metrics.len(), 2);
        assert_eq!(result.metrics[0].competition, Competition::High);
        assert!(!result.summary.is_empty());
        assert_ne!(result.summary, FALLBACK_SUMMARY);
        assert!(result.summary.contains("plant-based niche"));
        assert_eq!(result.grounding_chunks.len(), 1);
    }

    #[tokio::test]
    async fn missing_separator_uses_fallback_summary() {
        let text = r#"No separator, just data: [{"keyword": "espresso"}]"#;
        let mock = MockModel::with_text(text);
        let result = analyze(&mock, "espresso", "Berlin", None).await.unwrap();
        assert_eq!(result.summary, FALLBACK_SUMMARY);
        assert_eq!(result.metrics.len(), 1);
    }

    #[tokio::test]
    async fn narrative_only_response_degrades_to_empty_metrics() {
        let mock = MockModel::with_text("I could not find structured data for these keywords.");
        let result = analyze(&mock, "espresso", "Berlin", None).await.unwrap();
        assert!(result.metrics.is_empty());
        assert!(!result.summary.is_empty());
        assert!(result.grounding_chunks.is_empty());
    }

    #[tokio::test]
    async fn separator_with_empty_narrative_still_has_summary() {
        let text = format!("{}\n[]", JSON_SEPARATOR);
        let mock = MockModel::with_text(&text);
        let result = analyze(&mock, "espresso", "Berlin", None).await.unwrap();
        assert_eq!(result.summary, FALLBACK_SUMMARY);
        assert!(result.metrics.is_empty());
    }

    #[tokio::test]
    async fn empty_response_is_a_provider_error() {
        let mock = MockModel::with_text("");
        let err = analyze(&mock, "espresso", "Berlin", None).await.unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyResponse));
    }

    #[tokio::test]
    async fn safety_rejection_maps_to_distinct_error() {
        let mock = MockModel::default();
        mock.push(Err(ModelError::Blocked {
            reason: "SAFETY".to_string(),
        }));
        let err = analyze(&mock, "espresso", "Berlin", None).await.unwrap_err();
        assert!(matches!(err, AnalysisError::SafetyBlocked));
    }

    #[tokio::test]
    async fn provider_error_preserves_message() {
        let mock = MockModel::default();
        mock.push(Err(ModelError::Api {
            status: 429,
            message: "quota exceeded".to_string(),
        }));
        let err = analyze(&mock, "espresso", "Berlin", None).await.unwrap_err();
        match err {
            AnalysisError::Provider(message) => assert!(message.contains("quota exceeded")),
            other => panic!("expected Provider, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn blank_inputs_are_rejected_before_any_call() {
        let mock = MockModel::default();
        assert!(matches!(
            analyze(&mock, "  ", "Berlin", None).await,
            Err(AnalysisError::EmptyInput)
        ));
        assert!(matches!(
            analyze(&mock, "espresso", "", None).await,
            Err(AnalysisError::EmptyInput)
        ));
        assert!(matches!(
            analyze(&mock, " ,\n, ", "Berlin", None).await,
            Err(AnalysisError::EmptyInput)
        ));
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_network() {
        let config = Config {
            api: crate::config::ApiConfig { gemini_key: None },
            ..Config::default()
        };
        // Only meaningful when the environment does not inject a key.
        if std::env::var("GEMINI_API_KEY").is_err() {
            let err = analyze_with_config(&config, "espresso", "Berlin", None)
                .await
                .unwrap_err();
            assert!(matches!(err, AnalysisError::Config(_)));
        }
    }
}
