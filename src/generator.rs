//! @ai:module:intent Stage 1: generate articles from every candidate model
//! @ai:module:layer application
//! @ai:module:public_api ContentGenerator, article_prompt, compute_cost
//! @ai:module:stateless false

use crate::config::{ApiConfig, ModelConfig};
use crate::error::Result;
use crate::prompts::PromptSpec;
use crate::provider::{CompletionRequest, ProviderClient};
use crate::store::{self, ContentItem};
use std::path::Path;
use std::sync::Arc;

pub const WRITER_SYSTEM_PROMPT: &str = "You are an expert tech writer with a friendly, \
     witty personality. Produce fact-checked, safe, and highly accurate articles.";

/// @ai:intent Build the article assignment for one prompt
/// @ai:effects pure
pub fn article_prompt(prompt: &PromptSpec) -> String {
    format!(
        "Title: \"{}\"\n\
         - Write a 1,500 - 2,500 word article.\n\
         - Cite at least two reputable sources with URLs.\n\
         - Cover these keywords: {}.\n\
         - Avoid unsafe, biased, or sensitive content.\n\
         - Use a warm, conversational tone with a light joke or analogy.",
        prompt.title,
        prompt.keyword_list()
    )
}

/// @ai:intent Dollar cost of a call from the model's per-1M-token pricing
/// @ai:effects pure
pub fn compute_cost(model: &ModelConfig, prompt_tokens: u32, completion_tokens: u32) -> f64 {
    let cost = (prompt_tokens as f64 / 1e6) * model.input_price
        + (completion_tokens as f64 / 1e6) * model.output_price;
    round4(cost)
}

/// @ai:intent Round to 4 decimal places for artifact stability
/// @ai:effects pure
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// @ai:intent Runs every configured model against every prompt
pub struct ContentGenerator<C: ProviderClient> {
    client: Arc<C>,
    api: ApiConfig,
}

impl<C: ProviderClient> ContentGenerator<C> {
    /// @ai:intent Create a new generator
    /// @ai:effects pure
    pub fn new(client: Arc<C>, api: ApiConfig) -> Self {
        Self { client, api }
    }

    /// @ai:intent Generate one item, measuring latency and computing cost
    /// @ai:effects network
    async fn generate_item(
        &self,
        model: &ModelConfig,
        prompt: &PromptSpec,
    ) -> Result<ContentItem> {
        let request = CompletionRequest {
            system: WRITER_SYSTEM_PROMPT.to_string(),
            user: article_prompt(prompt),
            temperature: self.api.generation_temperature,
            max_output_tokens: self.api.max_output_tokens,
        };

        let start = std::time::Instant::now();
        let response = self.client.generate(model, &request).await?;
        let latency = start.elapsed().as_millis() as u64;

        Ok(ContentItem {
            model_id: model.id.clone(),
            prompt_id: prompt.id.clone(),
            text: response.text,
            prompt_tokens: response.prompt_tokens,
            completion_tokens: response.completion_tokens,
            cost: compute_cost(model, response.prompt_tokens, response.completion_tokens),
            latency,
            word_count: None,
            broken_links: None,
            accuracy: None,
            safety: None,
            factuality: None,
            tone: None,
        })
    }

    /// @ai:intent Run the stage, saving after each item for safe resumption
    ///
    /// Provider failures are logged and the item skipped; the batch is
    /// never aborted by a single model call.
    /// @ai:effects network, fs:write
    pub async fn run(
        &self,
        models: &[ModelConfig],
        prompts: &[PromptSpec],
        output_path: &Path,
    ) -> Result<Vec<ContentItem>> {
        let mut items = store::load_items_or_default(output_path)?;
        let total = models.len() * prompts.len();
        let mut current = 0usize;

        for model in models {
            tracing::info!("Evaluating {}", model.id);

            for prompt in prompts {
                current += 1;
                tracing::info!("[{}/{}] Generating {} for {}", current, total, prompt.id, model.id);

                match self.generate_item(model, prompt).await {
                    Ok(item) => {
                        tracing::info!(
                            "  {}: lat={}ms, in={} tok, out={} tok, cost=${:.4}",
                            prompt.id,
                            item.latency,
                            item.prompt_tokens,
                            item.completion_tokens,
                            item.cost
                        );
                        store::upsert_item(&mut items, item);
                        store::save_items(output_path, &items)?;
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Skipping {}/{}: {}",
                            model.id,
                            prompt.id,
                            e
                        );
                    }
                }
            }
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelProvider;
    use crate::provider::MockProviderClient;
    use crate::store::key_set;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn test_model(id: &str) -> ModelConfig {
        ModelConfig {
            id: id.to_string(),
            provider: ModelProvider::OpenAi,
            input_price: 1.10,
            output_price: 4.40,
            words_per_token: 0.80,
        }
    }

    fn test_prompt(id: &str) -> PromptSpec {
        PromptSpec {
            id: id.to_string(),
            title: "Test Article".to_string(),
            keywords: vec!["alpha".to_string(), "beta".to_string()],
        }
    }

    #[test]
    fn test_article_prompt_contains_title_and_keywords() {
        let prompt = article_prompt(&test_prompt("P1"));
        assert!(prompt.contains("Test Article"));
        assert!(prompt.contains("alpha, beta"));
        assert!(prompt.contains("reputable sources"));
    }

    #[test]
    fn test_compute_cost() {
        let model = test_model("m");
        // 1M in at $1.10 + 0.5M out at $4.40 -> $3.30
        let cost = compute_cost(&model, 1_000_000, 500_000);
        assert!((cost - 3.30).abs() < 1e-9);
    }

    #[test]
    fn test_compute_cost_rounds_to_4_decimals() {
        let model = test_model("m");
        let cost = compute_cost(&model, 123, 456);
        assert_eq!(cost, (cost * 10_000.0).round() / 10_000.0);
    }

    #[tokio::test]
    async fn test_run_generates_all_pairs() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("content_with_costs.json");

        let client = Arc::new(MockProviderClient::new("a generated article"));
        let generator = ContentGenerator::new(client, ApiConfig::default());

        let models = vec![test_model("model-a"), test_model("model-b")];
        let prompts = vec![test_prompt("P1"), test_prompt("P2")];

        let items = generator.run(&models, &prompts, &output).await.unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(key_set(&items).len(), 4);
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_run_skips_failing_model() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("content_with_costs.json");

        let client =
            Arc::new(MockProviderClient::new("a generated article").failing_for(&["model-b"]));
        let generator = ContentGenerator::new(client, ApiConfig::default());

        let models = vec![test_model("model-a"), test_model("model-b")];
        let prompts = vec![test_prompt("P1")];

        let items = generator.run(&models, &prompts, &output).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].model_id, "model-a");
    }

    #[tokio::test]
    async fn test_run_is_idempotent_by_key() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("content_with_costs.json");

        let client = Arc::new(MockProviderClient::new("a generated article"));
        let generator = ContentGenerator::new(client, ApiConfig::default());

        let models = vec![test_model("model-a")];
        let prompts = vec![test_prompt("P1")];

        generator.run(&models, &prompts, &output).await.unwrap();
        let items = generator.run(&models, &prompts, &output).await.unwrap();
        assert_eq!(items.len(), 1);
    }
}
