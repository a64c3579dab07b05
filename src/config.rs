//! @ai:module:intent Configuration structs for the contest pipeline
//! @ai:module:layer infrastructure
//! @ai:module:public_api ContestConfig, ApiConfig, ModelConfig, JudgeConfig, QcConfig, ScoreWeights, PathConfig
//! @ai:module:stateless true

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// @ai:intent Main configuration for the contest pipeline
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default = "default_models")]
    pub models: Vec<ModelConfig>,
    #[serde(default)]
    pub judge: JudgeConfig,
    #[serde(default)]
    pub qc: QcConfig,
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub paths: PathConfig,
}

/// @ai:intent Which API a model is served by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    OpenAi,
    Gemini,
}

impl ModelProvider {
    /// @ai:intent Convert provider to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelProvider::OpenAi => "openai",
            ModelProvider::Gemini => "gemini",
        }
    }
}

impl std::fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent A candidate model with its pricing
///
/// Prices are $ per 1M tokens. `words_per_token` is the ratio used to
/// approximate token counts when the provider does not report usage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub id: String,
    pub provider: ModelProvider,
    #[serde(default)]
    pub input_price: f64,
    #[serde(default)]
    pub output_price: f64,
    #[serde(default = "default_words_per_token")]
    pub words_per_token: f64,
}

impl ModelConfig {
    /// @ai:intent Build a model entry with no pricing (judge/checker models)
    /// @ai:effects pure
    pub fn unpriced(id: &str, provider: ModelProvider) -> Self {
        Self {
            id: id.to_string(),
            provider,
            input_price: 0.0,
            output_price: 0.0,
            words_per_token: default_words_per_token(),
        }
    }
}

/// @ai:intent API call configuration shared by all provider clients
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_generation_temperature")]
    pub generation_temperature: f32,
    #[serde(default = "default_judge_temperature")]
    pub judge_temperature: f32,
    #[serde(default = "default_rate_limit")]
    pub requests_per_minute: u32,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_link_timeout")]
    pub link_timeout_secs: u64,
}

/// @ai:intent Judge model selection for cross-judging
///
/// Content generated by a Gemini model is scored by `openai_model` and
/// everything else by `gemini_model`, so no model scores its own output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    #[serde(default = "default_openai_judge")]
    pub openai_model: String,
    #[serde(default = "default_gemini_judge")]
    pub gemini_model: String,
}

impl JudgeConfig {
    /// @ai:intent Judge model entry for the OpenAI side
    /// @ai:effects pure
    pub fn openai_judge(&self) -> ModelConfig {
        ModelConfig::unpriced(&self.openai_model, ModelProvider::OpenAi)
    }

    /// @ai:intent Judge model entry for the Gemini side
    /// @ai:effects pure
    pub fn gemini_judge(&self) -> ModelConfig {
        ModelConfig::unpriced(&self.gemini_model, ModelProvider::Gemini)
    }
}

/// @ai:intent Writer/checker models for the live QC loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QcConfig {
    #[serde(default = "default_openai_judge")]
    pub writer_model: String,
    #[serde(default = "default_gemini_judge")]
    pub checker_model: String,
    #[serde(default = "default_qc_attempts")]
    pub max_attempts: u32,
}

impl QcConfig {
    /// @ai:intent Writer model entry (OpenAI side)
    /// @ai:effects pure
    pub fn writer(&self) -> ModelConfig {
        ModelConfig::unpriced(&self.writer_model, ModelProvider::OpenAi)
    }

    /// @ai:intent Checker model entry (Gemini side)
    /// @ai:effects pure
    pub fn checker(&self) -> ModelConfig {
        ModelConfig::unpriced(&self.checker_model, ModelProvider::Gemini)
    }
}

/// @ai:intent Fixed weights applied to normalized metrics
///
/// The weights must sum to 1.0; `validate` enforces this before ranking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub cost: f64,
    pub accuracy: f64,
    pub factuality: f64,
    pub safety: f64,
    pub word_count: f64,
    pub latency: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            cost: 0.25,
            accuracy: 0.30,
            factuality: 0.15,
            safety: 0.10,
            word_count: 0.10,
            latency: 0.10,
        }
    }
}

impl ScoreWeights {
    /// @ai:intent Sum of all weights
    /// @ai:effects pure
    pub fn total(&self) -> f64 {
        self.cost + self.accuracy + self.factuality + self.safety + self.word_count + self.latency
    }

    /// @ai:intent Reject weight sets that do not sum to 1.0
    /// @ai:effects pure
    pub fn validate(&self) -> Result<()> {
        let total = self.total();

        if (total - 1.0).abs() > 1e-9 {
            return Err(PipelineError::Config(format!(
                "score weights must sum to 1.0, got {total}"
            )));
        }

        Ok(())
    }
}

/// @ai:intent Path configuration for prompts and artifacts
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    pub prompts_dir: PathBuf,
    pub output_dir: PathBuf,
    pub qc_dir: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            prompts_dir: PathBuf::from("prompts"),
            output_dir: PathBuf::from("raw_outputs"),
            qc_dir: PathBuf::from("qc_results"),
        }
    }
}

impl PathConfig {
    /// @ai:intent Stage 1 artifact path
    /// @ai:effects pure
    pub fn costs_file(&self) -> PathBuf {
        self.output_dir.join(crate::store::CONTENT_WITH_COSTS)
    }

    /// @ai:intent Stage 2 artifact path
    /// @ai:effects pure
    pub fn analysis_file(&self) -> PathBuf {
        self.output_dir.join(crate::store::CONTENT_WITH_ANALYSIS)
    }

    /// @ai:intent Stage 3 artifact path
    /// @ai:effects pure
    pub fn judgment_file(&self) -> PathBuf {
        self.output_dir.join(crate::store::CONTENT_WITH_JUDGMENT)
    }

    /// @ai:intent Stage 4 artifact path
    /// @ai:effects pure
    pub fn results_file(&self) -> PathBuf {
        self.output_dir.join(crate::store::CONTEST_RESULTS)
    }
}

impl Default for ContestConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            models: default_models(),
            judge: JudgeConfig::default(),
            qc: QcConfig::default(),
            weights: ScoreWeights::default(),
            paths: PathConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: default_max_output_tokens(),
            generation_temperature: default_generation_temperature(),
            judge_temperature: default_judge_temperature(),
            requests_per_minute: default_rate_limit(),
            request_timeout_secs: default_request_timeout(),
            link_timeout_secs: default_link_timeout(),
        }
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            openai_model: default_openai_judge(),
            gemini_model: default_gemini_judge(),
        }
    }
}

impl Default for QcConfig {
    fn default() -> Self {
        Self {
            writer_model: default_openai_judge(),
            checker_model: default_gemini_judge(),
            max_attempts: default_qc_attempts(),
        }
    }
}

fn default_models() -> Vec<ModelConfig> {
    vec![
        ModelConfig {
            id: "gemini-2.5-flash-preview-05-20".to_string(),
            provider: ModelProvider::Gemini,
            input_price: 0.15,
            output_price: 3.50,
            words_per_token: 0.70,
        },
        ModelConfig {
            id: "o4-mini".to_string(),
            provider: ModelProvider::OpenAi,
            input_price: 1.10,
            output_price: 4.40,
            words_per_token: 0.80,
        },
    ]
}

fn default_words_per_token() -> f64 {
    0.75
}

fn default_max_output_tokens() -> u32 {
    2000
}

fn default_generation_temperature() -> f32 {
    0.7
}

fn default_judge_temperature() -> f32 {
    0.1
}

fn default_rate_limit() -> u32 {
    60
}

fn default_request_timeout() -> u64 {
    120
}

fn default_link_timeout() -> u64 {
    5
}

fn default_openai_judge() -> String {
    "o4-mini".to_string()
}

fn default_gemini_judge() -> String {
    "gemini-2.5-flash-preview-05-20".to_string()
}

fn default_qc_attempts() -> u32 {
    3
}

impl ContestConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("failed to read config {}: {e}", path.display()))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            PipelineError::Config(format!("failed to parse config {}: {e}", path.display()))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PipelineError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @ai:intent Check invariants the stages rely on
    /// @ai:effects pure
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;

        if self.models.is_empty() {
            return Err(PipelineError::Config(
                "at least one candidate model must be configured".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = ScoreWeights::default();
        assert!((weights.total() - 1.0).abs() < 1e-9);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let weights = ScoreWeights {
            cost: 0.5,
            ..Default::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ContestConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.models.len(), 2);
    }

    #[test]
    fn test_config_roundtrip() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("contest.toml");

        let config = ContestConfig::default();
        config.save(&path).unwrap();

        let loaded = ContestConfig::load(&path).unwrap();
        assert_eq!(loaded.models[0].id, config.models[0].id);
        assert_eq!(loaded.judge.gemini_model, config.judge.gemini_model);
    }

    #[test]
    fn test_load_missing_config_is_config_error() {
        let err = ContestConfig::load(std::path::Path::new("/nonexistent/contest.toml"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_cross_judge_models() {
        let judge = JudgeConfig::default();
        assert_eq!(judge.openai_judge().provider, ModelProvider::OpenAi);
        assert_eq!(judge.gemini_judge().provider, ModelProvider::Gemini);
    }
}
