//! @ai:module:intent TOML loader for the prompt catalog
//! @ai:module:layer infrastructure
//! @ai:module:public_api PromptLoader
//! @ai:module:stateless true

use crate::error::{PipelineError, Result};
use crate::prompts::prompt::{PromptFile, PromptSpec};
use std::path::Path;
use walkdir::WalkDir;

/// @ai:intent Trait for loading the prompt catalog
pub trait PromptLoaderTrait: Send + Sync {
    /// @ai:intent Load all prompts from the catalog directory
    fn load_all(&self, prompts_dir: &Path) -> Result<Vec<PromptSpec>>;

    /// @ai:intent Load a single prompt by ID
    fn load_by_id(&self, prompts_dir: &Path, prompt_id: &str) -> Result<Option<PromptSpec>>;
}

/// @ai:intent Loads prompt definitions from TOML files
pub struct PromptLoader;

impl PromptLoader {
    /// @ai:intent Create a new prompt loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Parse a single prompt file
    /// @ai:pre path points to a valid TOML file
    /// @ai:effects fs:read
    fn parse_prompt_file(path: &Path) -> Result<PromptSpec> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("failed to read prompt file {}: {e}", path.display()))
        })?;

        let prompt_file: PromptFile = toml::from_str(&content).map_err(|e| {
            PipelineError::Config(format!(
                "failed to parse prompt file {}: {e}",
                path.display()
            ))
        })?;

        Ok(prompt_file.into())
    }

    /// @ai:intent Find all TOML files under the catalog directory
    /// @ai:effects fs:read
    fn find_prompt_files(prompts_dir: &Path) -> Vec<std::path::PathBuf> {
        WalkDir::new(prompts_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "toml")
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect()
    }
}

impl Default for PromptLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptLoaderTrait for PromptLoader {
    /// @ai:intent Load all prompts, skipping unparseable files with a warning
    /// @ai:effects fs:read
    fn load_all(&self, prompts_dir: &Path) -> Result<Vec<PromptSpec>> {
        if !prompts_dir.exists() {
            return Err(PipelineError::Config(format!(
                "prompts directory not found: {}",
                prompts_dir.display()
            )));
        }

        let files = Self::find_prompt_files(prompts_dir);
        let mut prompts = Vec::with_capacity(files.len());

        for path in files {
            match Self::parse_prompt_file(&path) {
                Ok(prompt) => prompts.push(prompt),
                Err(e) => {
                    tracing::warn!("Skipping invalid prompt file {}: {}", path.display(), e);
                }
            }
        }

        if prompts.is_empty() {
            return Err(PipelineError::Config(format!(
                "no prompts found in {}",
                prompts_dir.display()
            )));
        }

        prompts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(prompts)
    }

    /// @ai:intent Load a single prompt by ID
    /// @ai:effects fs:read
    fn load_by_id(&self, prompts_dir: &Path, prompt_id: &str) -> Result<Option<PromptSpec>> {
        let all = self.load_all(prompts_dir)?;
        Ok(all.into_iter().find(|p| p.id == prompt_id))
    }
}
