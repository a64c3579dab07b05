//! @ai:module:intent OpenAI chat completions client
//! @ai:module:layer infrastructure
//! @ai:module:public_api OpenAiClient
//! @ai:module:stateless false

use crate::config::{ApiConfig, ModelConfig};
use crate::error::{PipelineError, Result};
use crate::provider::client::{CompletionRequest, ProviderClient, ProviderResponse};
use crate::provider::rate_limiter::RateLimiter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// @ai:intent OpenAI API request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// @ai:intent OpenAI API response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: ChatUsage,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// @ai:intent OpenAI client with rate limiting
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    rate_limiter: Arc<RateLimiter>,
}

impl OpenAiClient {
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

impl ProviderClient for OpenAiClient {
    /// @ai:intent Send a chat completion request
    /// @ai:effects network
    async fn generate(
        &self,
        model: &ModelConfig,
        request: &CompletionRequest,
    ) -> Result<ProviderResponse> {
        self.rate_limiter.acquire().await;

        let body = ChatRequest {
            model: &model.id,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
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

        let api_response: ChatResponse =
            response.json().await.map_err(|e| PipelineError::Provider {
                model: model.id.clone(),
                message: format!("failed to parse response: {e}"),
            })?;

        let text = api_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| PipelineError::Provider {
                model: model.id.clone(),
                message: "empty response: no choices returned".to_string(),
            })?;

        Ok(ProviderResponse {
            text,
            prompt_tokens: api_response.usage.prompt_tokens,
            completion_tokens: api_response.usage.completion_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: "o4-mini",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "write",
                },
            ],
            max_tokens: 2000,
            temperature: 0.7,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "o4-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "write");
    }

    #[test]
    fn test_response_body_parse() {
        let raw = r#"{
            "choices": [{"message": {"role": "assistant", "content": "hello"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 34, "total_tokens": 46}
        }"#;

        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "hello");
        assert_eq!(parsed.usage.completion_tokens, 34);
    }
}
