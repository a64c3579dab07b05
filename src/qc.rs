//! @ai:module:intent Live quality-control loop: draft, check, revise once
//! @ai:module:layer application
//! @ai:module:public_api QcRunner, QcVerdict, extract_json
//! @ai:module:stateless false

use crate::config::{ApiConfig, QcConfig};
use crate::error::{PipelineError, Result};
use crate::generator::{article_prompt, WRITER_SYSTEM_PROMPT};
use crate::prompts::PromptSpec;
use crate::provider::{CompletionRequest, ProviderClient};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// @ai:intent Checker decision on one draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QcVerdict {
    pub verdict: String,
    pub tip: String,
}

impl QcVerdict {
    /// @ai:intent Whether the checker approved the draft
    /// @ai:effects pure
    pub fn approved(&self) -> bool {
        self.verdict == "APPROVED"
    }
}

/// @ai:intent Saved outcome of one QC run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QcRecord {
    pub timestamp: String,
    pub content: String,
    pub qc_result: QcVerdict,
    pub status: String,
}

/// @ai:intent Extract a JSON object from a response with surrounding text
/// @ai:effects pure
pub fn extract_json(response: &str) -> Result<String> {
    let start = response
        .find('{')
        .ok_or_else(|| PipelineError::Analysis("no JSON object found in response".to_string()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| PipelineError::Analysis("no JSON object end found in response".to_string()))?;

    if end <= start {
        return Err(PipelineError::Analysis(
            "invalid JSON structure in response".to_string(),
        ));
    }

    Ok(response[start..=end].to_string())
}

/// @ai:intent Build the checker prompt for one draft
/// @ai:effects pure
fn checker_prompt(content: &str) -> String {
    format!(
        "You are a content quality checker. Analyze this draft and provide a JSON response with:\n\
         1. A verdict: \"APPROVED\" if the content is clear, factual, and safe, otherwise \"REJECTED\"\n\
         2. A brief tip for improvement if rejected\n\n\
         Format your response exactly like this JSON:\n\
         {{\n    \"verdict\": \"APPROVED\" or \"REJECTED\",\n    \"tip\": \"your improvement suggestion\"\n}}\n\n\
         Draft:\n{content}"
    )
}

/// @ai:intent Drafts with the writer model and screens with the checker
pub struct QcRunner<C: ProviderClient> {
    client: Arc<C>,
    qc: QcConfig,
    api: ApiConfig,
}

impl<C: ProviderClient> QcRunner<C> {
    /// @ai:intent Create a new QC runner
    /// @ai:effects pure
    pub fn new(client: Arc<C>, qc: QcConfig, api: ApiConfig) -> Self {
        Self { client, qc, api }
    }

    /// @ai:intent Generate a draft, retrying with exponential backoff
    /// @ai:effects network, time
    async fn generate_draft(&self, prompt: &PromptSpec, tip: Option<&str>) -> Result<String> {
        let mut user = article_prompt(prompt);

        if let Some(tip) = tip {
            user.push_str(&format!("\n- {tip}"));
        }

        let request = CompletionRequest {
            system: WRITER_SYSTEM_PROMPT.to_string(),
            user,
            temperature: self.api.generation_temperature,
            max_output_tokens: self.api.max_output_tokens,
        };

        let writer = self.qc.writer();
        let mut last_error = None;

        for attempt in 0..self.qc.max_attempts {
            match self.client.generate(&writer, &request).await {
                Ok(response) => {
                    tracing::info!("Generated draft on attempt {}", attempt + 1);
                    return Ok(response.text);
                }
                Err(e) => {
                    tracing::warn!("Draft attempt {} failed: {}", attempt + 1, e);
                    last_error = Some(e);

                    if attempt + 1 < self.qc.max_attempts {
                        tokio::time::sleep(std::time::Duration::from_secs(2u64.pow(attempt)))
                            .await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| PipelineError::Provider {
            model: writer.id.clone(),
            message: "no attempts were made".to_string(),
        }))
    }

    /// @ai:intent Screen a draft, retrying with exponential backoff
    /// @ai:effects network, time
    async fn check_quality(&self, content: &str) -> Result<QcVerdict> {
        let request = CompletionRequest {
            system: "You are a strict content quality checker. Respond only with the \
                     requested JSON."
                .to_string(),
            user: checker_prompt(content),
            temperature: self.api.judge_temperature,
            max_output_tokens: self.api.max_output_tokens,
        };

        let checker = self.qc.checker();
        let mut last_error = None;

        for attempt in 0..self.qc.max_attempts {
            let result = match self.client.generate(&checker, &request).await {
                Ok(response) => extract_json(&response.text).and_then(|json| {
                    serde_json::from_str::<QcVerdict>(&json).map_err(|e| {
                        PipelineError::Analysis(format!("checker returned invalid JSON: {e}"))
                    })
                }),
                Err(e) => Err(e),
            };

            match result {
                Ok(verdict) => {
                    tracing::info!("Quality check completed on attempt {}", attempt + 1);
                    return Ok(verdict);
                }
                Err(e) => {
                    tracing::warn!("Quality check attempt {} failed: {}", attempt + 1, e);
                    last_error = Some(e);

                    if attempt + 1 < self.qc.max_attempts {
                        tokio::time::sleep(std::time::Duration::from_secs(2u64.pow(attempt)))
                            .await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| PipelineError::Provider {
            model: checker.id.clone(),
            message: "no attempts were made".to_string(),
        }))
    }

    /// @ai:intent Save a run record under the QC results directory
    /// @ai:effects fs:write
    fn save_record(output_dir: &Path, record: &QcRecord) -> Result<PathBuf> {
        std::fs::create_dir_all(output_dir)?;

        let path = output_dir.join(format!("article_{}.json", record.timestamp));
        std::fs::write(&path, serde_json::to_string_pretty(record)?)?;

        tracing::info!("QC results saved to {}", path.display());
        Ok(path)
    }

    /// @ai:intent Run the full draft/check/revise loop for one prompt
    /// @ai:effects network, fs:write, time
    pub async fn run(&self, prompt: &PromptSpec, output_dir: &Path) -> Result<PathBuf> {
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string();

        tracing::info!("Generating initial draft for {}", prompt.id);
        let draft = self.generate_draft(prompt, None).await?;

        tracing::info!("Performing quality check");
        let verdict = self.check_quality(&draft).await?;

        if verdict.approved() {
            tracing::info!("Draft approved on first attempt");
            return Self::save_record(
                output_dir,
                &QcRecord {
                    timestamp,
                    content: draft,
                    qc_result: verdict,
                    status: "approved".to_string(),
                },
            );
        }

        tracing::info!("Draft rejected: {}", verdict.tip);
        tracing::info!("Generating revised draft");

        match self.generate_draft(prompt, Some(&verdict.tip)).await {
            Ok(revised) => {
                let revised_verdict = self.check_quality(&revised).await?;
                let status = if revised_verdict.approved() {
                    "approved_revised"
                } else {
                    "rejected_revised"
                };

                tracing::info!("Revised draft {}", status);
                Self::save_record(
                    output_dir,
                    &QcRecord {
                        timestamp,
                        content: revised,
                        qc_result: revised_verdict,
                        status: status.to_string(),
                    },
                )
            }
            Err(e) => {
                tracing::warn!("Failed to generate revision: {}", e);
                Self::save_record(
                    output_dir,
                    &QcRecord {
                        timestamp,
                        content: draft,
                        qc_result: verdict,
                        status: "rejected_no_revision".to_string(),
                    },
                )
            }
        }
    }
}
