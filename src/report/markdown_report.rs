//! @ai:module:intent Markdown leaderboard report
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::contest::ModelScore;
use crate::error::Result;
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Write the leaderboard as Markdown
    fn generate(&self, scores: &[ModelScore], output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates the Markdown leaderboard
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Render the leaderboard document
    /// @ai:effects pure
    fn render(scores: &[ModelScore]) -> String {
        let mut output = String::new();

        writeln!(output, "# Contest Leaderboard").unwrap();
        writeln!(output).unwrap();

        if let Some(winner) = scores.first() {
            writeln!(
                output,
                "**Winner:** {} (composite score {:.4})",
                winner.model_id, winner.composite_score
            )
            .unwrap();
            writeln!(output).unwrap();
        }

        writeln!(
            output,
            "| Rank | Model | Composite | Cost | Accuracy | Factuality | Safety | Words | Latency |"
        )
        .unwrap();
        writeln!(
            output,
            "|------|-------|-----------|------|----------|------------|--------|-------|---------|"
        )
        .unwrap();

        for score in scores {
            writeln!(
                output,
                "| {} | {} | {:.4} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} |",
                score.rank,
                score.model_id,
                score.composite_score,
                score.cost_norm,
                score.accuracy_norm,
                score.factuality_norm,
                score.safety_norm,
                score.wordcount_norm,
                score.latency_norm
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        writeln!(
            output,
            "All metric columns are min-max normalized onto [0, 1]; cost and \
             latency are inverted so higher is better everywhere."
        )
        .unwrap();

        output
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Write the leaderboard to file
    /// @ai:effects fs:write
    fn generate(&self, scores: &[ModelScore], output_path: &Path) -> Result<()> {
        std::fs::write(output_path, Self::render(scores))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(model_id: &str, composite: f64, rank: u32) -> ModelScore {
        ModelScore {
            model_id: model_id.to_string(),
            cost_norm: 0.5,
            accuracy_norm: 0.5,
            factuality_norm: 0.5,
            safety_norm: 0.5,
            wordcount_norm: 0.5,
            latency_norm: 0.5,
            composite_score: composite,
            rank,
        }
    }

    #[test]
    fn test_render_names_winner_first() {
        let rendered = MarkdownReporter::render(&[
            score("model-a", 0.65, 1),
            score("model-b", 0.35, 2),
        ]);

        assert!(rendered.contains("**Winner:** model-a"));
        assert!(rendered.contains("| 1 | model-a | 0.6500 |"));
        assert!(rendered.contains("| 2 | model-b | 0.3500 |"));
    }

    #[test]
    fn test_render_empty_has_no_winner_line() {
        let rendered = MarkdownReporter::render(&[]);
        assert!(!rendered.contains("Winner"));
        assert!(rendered.contains("# Contest Leaderboard"));
    }
}
