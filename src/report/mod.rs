//! @ai:module:intent Report generation for contest results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, JsonReporter, MarkdownReporter, ChartGenerator

pub mod charts;
pub mod json_report;
pub mod markdown_report;

pub use charts::{ChartGenerator, ChartGeneratorTrait};
pub use json_report::{JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};

use crate::contest::ModelScore;
use crate::error::Result;
use std::path::Path;

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
    charts: ChartGenerator,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
            charts: ChartGenerator::new(),
        }
    }

    /// @ai:intent Generate all report artifacts
    /// @ai:effects fs:write
    pub fn generate_all(&self, scores: &[ModelScore], output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;

        self.json
            .generate(scores, &output_dir.join(crate::store::CONTEST_RESULTS))?;
        self.markdown
            .generate(scores, &output_dir.join("leaderboard.md"))?;
        self.charts.generate_all(scores, output_dir)?;

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(())
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}
