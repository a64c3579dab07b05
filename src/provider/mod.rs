//! @ai:module:intent Provider API clients for generation and judging
//! @ai:module:layer infrastructure
//! @ai:module:public_api ProviderClient, ProviderGateway, OpenAiClient, GeminiClient, RateLimiter

pub mod client;
pub mod gemini;
pub mod openai;
pub mod rate_limiter;

pub use client::{CompletionRequest, MockProviderClient, ProviderClient, ProviderResponse};
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use rate_limiter::RateLimiter;

use crate::config::{ApiConfig, ModelConfig, ModelProvider};
use crate::error::{PipelineError, Result};
use std::sync::Arc;

/// @ai:intent Routes calls to the client matching a model's provider
///
/// Owns one client per provider and a shared rate limiter. Construction
/// fails before any API call if a required key is missing from the
/// environment.
pub struct ProviderGateway {
    openai: OpenAiClient,
    gemini: GeminiClient,
}

impl ProviderGateway {
    /// @ai:intent Build both clients from environment credentials
    /// @ai:pre OPENAI_API_KEY and GEMINI_API_KEY are set
    /// @ai:effects env
    pub fn from_env(api: &ApiConfig) -> Result<Self> {
        let openai_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| PipelineError::Config("OPENAI_API_KEY is not set".to_string()))?;
        let gemini_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| PipelineError::Config("GEMINI_API_KEY is not set".to_string()))?;

        let rate_limiter = Arc::new(RateLimiter::new(api.requests_per_minute));

        Ok(Self {
            openai: OpenAiClient::new(openai_key, api, Arc::clone(&rate_limiter))?,
            gemini: GeminiClient::new(gemini_key, api, rate_limiter)?,
        })
    }
}

impl ProviderClient for ProviderGateway {
    /// @ai:intent Dispatch by the model's provider
    /// @ai:effects network
    async fn generate(
        &self,
        model: &ModelConfig,
        request: &CompletionRequest,
    ) -> Result<ProviderResponse> {
        match model.provider {
            ModelProvider::OpenAi => self.openai.generate(model, request).await,
            ModelProvider::Gemini => self.gemini.generate(model, request).await,
        }
    }
}
