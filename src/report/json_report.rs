//! @ai:module:intent JSON results artifact
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter
//! @ai:module:stateless true

use crate::contest::ModelScore;
use crate::error::Result;
use std::path::Path;

/// @ai:intent Trait for JSON report generation
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Write the leaderboard as JSON
    fn generate(&self, scores: &[ModelScore], output_path: &Path) -> Result<()>;
}

/// @ai:intent Writes contest_results.json
///
/// The artifact carries no timestamps and scores are serialized in rank
/// order, so re-ranking the same input is byte-identical.
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:intent Write the leaderboard to file
    /// @ai:effects fs:write
    fn generate(&self, scores: &[ModelScore], output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(scores)?;
        std::fs::write(output_path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generated_json_is_deterministic() {
        let reporter = JsonReporter::new();
        let temp = TempDir::new().unwrap();

        let scores = vec![ModelScore {
            model_id: "model-a".to_string(),
            cost_norm: 1.0,
            accuracy_norm: 1.0,
            factuality_norm: 1.0,
            safety_norm: 1.0,
            wordcount_norm: 1.0,
            latency_norm: 1.0,
            composite_score: 1.0,
            rank: 1,
        }];

        let first_path = temp.path().join("first.json");
        let second_path = temp.path().join("second.json");
        reporter.generate(&scores, &first_path).unwrap();
        reporter.generate(&scores, &second_path).unwrap();

        let first = std::fs::read(&first_path).unwrap();
        let second = std::fs::read(&second_path).unwrap();
        assert_eq!(first, second);

        let content = String::from_utf8(first).unwrap();
        assert!(content.contains("model-a"));
        assert!(content.contains("composite_score"));
    }
}
