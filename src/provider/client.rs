//! @ai:module:intent Provider client trait and shared request/response types
//! @ai:module:layer infrastructure
//! @ai:module:public_api ProviderClient, CompletionRequest, ProviderResponse, MockProviderClient
//! @ai:module:stateless true

use crate::config::ModelConfig;
use crate::error::{PipelineError, Result};

/// @ai:intent One completion request against a provider model
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// @ai:intent Response from a provider, with token usage
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub text: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// @ai:intent Trait for model provider clients
#[allow(async_fn_in_trait)]
pub trait ProviderClient: Send + Sync {
    /// @ai:intent Send a completion request and return the generated text
    async fn generate(
        &self,
        model: &ModelConfig,
        request: &CompletionRequest,
    ) -> Result<ProviderResponse>;
}

/// @ai:intent Mock client for testing stage runners without network access
pub struct MockProviderClient {
    response: String,
    fail_models: std::collections::HashSet<String>,
}

impl MockProviderClient {
    /// @ai:intent Create a mock that returns a fixed response
    /// @ai:effects pure
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            fail_models: std::collections::HashSet::new(),
        }
    }

    /// @ai:intent Make calls for the given model IDs fail
    /// @ai:effects pure
    pub fn failing_for(mut self, model_ids: &[&str]) -> Self {
        self.fail_models = model_ids.iter().map(|id| id.to_string()).collect();
        self
    }
}

impl ProviderClient for MockProviderClient {
    /// @ai:intent Return the fixed response, or fail for scripted models
    /// @ai:effects pure
    async fn generate(
        &self,
        model: &ModelConfig,
        _request: &CompletionRequest,
    ) -> Result<ProviderResponse> {
        if self.fail_models.contains(&model.id) {
            return Err(PipelineError::Provider {
                model: model.id.clone(),
                message: "mock provider failure".to_string(),
            });
        }

        Ok(ProviderResponse {
            text: self.response.clone(),
            prompt_tokens: 100,
            completion_tokens: 200,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelProvider;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "system".to_string(),
            user: "user".to_string(),
            temperature: 0.7,
            max_output_tokens: 2000,
        }
    }

    #[tokio::test]
    async fn test_mock_client_returns_response() {
        let client = MockProviderClient::new("an article");
        let model = ModelConfig::unpriced("test-model", ModelProvider::OpenAi);

        let response = client.generate(&model, &request()).await.unwrap();
        assert_eq!(response.text, "an article");
        assert_eq!(response.prompt_tokens, 100);
    }

    #[tokio::test]
    async fn test_mock_client_scripted_failure() {
        let client = MockProviderClient::new("an article").failing_for(&["bad-model"]);
        let model = ModelConfig::unpriced("bad-model", ModelProvider::OpenAi);

        let err = client.generate(&model, &request()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Provider { .. }));
    }
}
