//! @ai:module:intent JSON artifact store shared by all pipeline stages
//! @ai:module:layer infrastructure
//! @ai:module:public_api ContentItem, load_items, save_items, upsert_item, key_set
//! @ai:module:stateless true

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

pub const CONTENT_WITH_COSTS: &str = "content_with_costs.json";
pub const CONTENT_WITH_ANALYSIS: &str = "content_with_analysis.json";
pub const CONTENT_WITH_JUDGMENT: &str = "content_with_judgment.json";
pub const CONTEST_RESULTS: &str = "contest_results.json";

/// @ai:intent One generated response and every metric attached to it
///
/// Created by the generator, enriched in place by the analyzer and the
/// judge. Fields that a stage has not populated yet are omitted from the
/// serialized artifact, so each artifact is the previous one plus the new
/// fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub model_id: String,
    pub prompt_id: String,
    pub text: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    /// USD, rounded to 4 decimals
    pub cost: f64,
    /// Milliseconds
    pub latency: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broken_links: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factuality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
}

impl ContentItem {
    /// @ai:intent The identity of an item across all artifacts
    /// @ai:effects pure
    pub fn key(&self) -> (String, String) {
        (self.model_id.clone(), self.prompt_id.clone())
    }
}

/// @ai:intent Load an artifact that a stage requires as input
/// @ai:effects fs:read
pub fn load_items(path: &Path) -> Result<Vec<ContentItem>> {
    if !path.exists() {
        return Err(PipelineError::Config(format!(
            "required input file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let items: Vec<ContentItem> = serde_json::from_str(&content)?;
    Ok(items)
}

/// @ai:intent Load an artifact that may not exist yet (resumed runs)
/// @ai:effects fs:read
pub fn load_items_or_default(path: &Path) -> Result<Vec<ContentItem>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    load_items(path)
}

/// @ai:intent Write an artifact as pretty JSON, creating parent directories
/// @ai:effects fs:write
pub fn save_items(path: &Path, items: &[ContentItem]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(items)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// @ai:intent Replace-or-append an item by its (model_id, prompt_id) key
///
/// Keeps insertion order stable so resumed runs produce the same artifact
/// layout as uninterrupted runs.
/// @ai:effects pure
pub fn upsert_item(items: &mut Vec<ContentItem>, item: ContentItem) {
    match items
        .iter_mut()
        .find(|existing| existing.model_id == item.model_id && existing.prompt_id == item.prompt_id)
    {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

/// @ai:intent The set of (model_id, prompt_id) keys in an artifact
/// @ai:effects pure
pub fn key_set(items: &[ContentItem]) -> BTreeSet<(String, String)> {
    items.iter().map(ContentItem::key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn test_item(model_id: &str, prompt_id: &str) -> ContentItem {
        ContentItem {
            model_id: model_id.to_string(),
            prompt_id: prompt_id.to_string(),
            text: "generated text".to_string(),
            prompt_tokens: 100,
            completion_tokens: 400,
            cost: 0.0015,
            latency: 1200,
            word_count: None,
            broken_links: None,
            accuracy: None,
            safety: None,
            factuality: None,
            tone: None,
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("raw_outputs").join(CONTENT_WITH_COSTS);

        let items = vec![test_item("model-a", "P1"), test_item("model-b", "P1")];
        save_items(&path, &items).unwrap();

        let loaded = load_items(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].model_id, "model-a");
        assert_eq!(key_set(&loaded), key_set(&items));
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = load_items(Path::new("/nonexistent/content.json")).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
        assert!(err.to_string().contains("content.json"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let items = load_items_or_default(Path::new("/nonexistent/content.json")).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_upsert_replaces_by_key() {
        let mut items = vec![test_item("model-a", "P1")];

        let mut updated = test_item("model-a", "P1");
        updated.word_count = Some(500);
        upsert_item(&mut items, updated);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].word_count, Some(500));

        upsert_item(&mut items, test_item("model-a", "P2"));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_unpopulated_fields_are_omitted() {
        let json = serde_json::to_string(&test_item("model-a", "P1")).unwrap();
        assert!(!json.contains("word_count"));
        assert!(!json.contains("accuracy"));
        assert!(json.contains("model_id"));
    }
}
