//! @ai:module:intent Google Gemini generateContent client
//! @ai:module:layer infrastructure
//! @ai:module:public_api GeminiClient
//! @ai:module:stateless false

use crate::config::{ApiConfig, ModelConfig};
use crate::error::{PipelineError, Result};
use crate::provider::client::{CompletionRequest, ProviderClient, ProviderResponse};
use crate::provider::rate_limiter::RateLimiter;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// @ai:intent Gemini API response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

/// @ai:intent Gemini client with rate limiting
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    rate_limiter: Arc<RateLimiter>,
}

impl GeminiClient {
    /// @ai:intent Create a client with the configured request timeout
    /// @ai:effects pure
    pub fn new(api_key: String, api: &ApiConfig, rate_limiter: Arc<RateLimiter>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(api.request_timeout_secs))
            .build()
            .map_err(|e| PipelineError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            rate_limiter,
        })
    }
}

/// @ai:intent Approximate a token count from a word count
///
/// Used when the API response carries no usage metadata; mirrors the
/// per-model words-per-token pricing ratio.
/// @ai:effects pure
fn approximate_tokens(text: &str, words_per_token: f64) -> u32 {
    let words = text.split_whitespace().count() as f64;
    (words / words_per_token).floor().max(1.0) as u32
}

impl ProviderClient for GeminiClient {
    /// @ai:intent Send a generateContent request
    /// @ai:effects network
    async fn generate(
        &self,
        model: &ModelConfig,
        request: &CompletionRequest,
    ) -> Result<ProviderResponse> {
        self.rate_limiter.acquire().await;

        // System instruction is a top-level field, auth is a header, roles
        // are "user"/"model" rather than OpenAI's "assistant".
        let body = json!({
            "system_instruction": { "parts": [{ "text": request.system }] },
            "contents": [{ "role": "user", "parts": [{ "text": request.user }] }],
            "generationConfig": {
                "maxOutputTokens": request.max_output_tokens,
                "temperature": request.temperature,
            },
        });

        let url = format!("{GEMINI_BASE_URL}/models/{}:generateContent", model.id);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::Provider {
                model: model.id.clone(),
                message: format!("request failed: {e}"),
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Provider {
                model: model.id.clone(),
                message: format!("API error ({status}): {error_text}"),
            });
        }

        let api_response: GenerateContentResponse =
            response.json().await.map_err(|e| PipelineError::Provider {
                model: model.id.clone(),
                message: format!("failed to parse response: {e}"),
            })?;

        let text = api_response
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .ok_or_else(|| PipelineError::Provider {
                model: model.id.clone(),
                message: "empty response: no candidates returned".to_string(),
            })?;

        let (prompt_tokens, completion_tokens) = match api_response.usage_metadata {
            Some(usage) => (
                usage.prompt_token_count.unwrap_or_else(|| {
                    approximate_tokens(&request.user, model.words_per_token)
                }),
                usage.candidates_token_count.unwrap_or_else(|| {
                    approximate_tokens(&text, model.words_per_token)
                }),
            ),
            None => (
                approximate_tokens(&request.user, model.words_per_token),
                approximate_tokens(&text, model.words_per_token),
            ),
        };

        Ok(ProviderResponse {
            text,
            prompt_tokens,
            completion_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_approximate_tokens() {
        // 7 words at 0.70 words per token -> 10 tokens
        let text = "one two three four five six seven";
        assert_eq!(approximate_tokens(text, 0.70), 10);
    }

    #[test]
    fn test_approximate_tokens_minimum_one() {
        assert_eq!(approximate_tokens("", 0.70), 1);
    }

    #[test]
    fn test_response_body_parse_with_usage() {
        let raw = r#"{
            "candidates": [{"content": {"parts": [{"text": "hel"}, {"text": "lo"}], "role": "model"}}],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 20}
        }"#;

        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let usage = parsed.usage_metadata.unwrap();
        assert_eq!(usage.prompt_token_count, Some(10));
        assert_eq!(parsed.candidates[0].content.parts.len(), 2);
    }

    #[test]
    fn test_response_body_parse_without_usage() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"text": "hi"}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.usage_metadata.is_none());
    }
}
