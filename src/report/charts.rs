//! @ai:module:intent Chart generation for contest results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator
//! @ai:module:stateless true

use crate::contest::ModelScore;
use crate::error::{PipelineError, Result};
use plotters::prelude::*;
use std::path::Path;

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Generate all charts from the leaderboard
    fn generate_all(&self, scores: &[ModelScore], output_dir: &Path) -> Result<Vec<String>>;
}

/// @ai:intent Generates charts from contest results
pub struct ChartGenerator;

impl ChartGenerator {
    /// @ai:intent Create a new chart generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Bar chart of composite scores, best model first
    /// @ai:effects fs:write
    fn generate_leaderboard_chart(
        &self,
        scores: &[ModelScore],
        output_path: &Path,
    ) -> Result<()> {
        let root = BitMapBackend::new(output_path, (800, 500)).into_drawing_area();
        root.fill(&WHITE).map_err(to_chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Contest Composite Scores", ("sans-serif", 25))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0..scores.len() as i32, 0f64..1f64)
            .map_err(to_chart_error)?;

        chart
            .configure_mesh()
            .y_desc("Composite score")
            .x_desc("Model")
            .x_label_formatter(&|x| {
                scores
                    .get(*x as usize)
                    .map(|s| s.model_id.clone())
                    .unwrap_or_default()
            })
            .draw()
            .map_err(to_chart_error)?;

        chart
            .draw_series(scores.iter().enumerate().map(|(i, score)| {
                Rectangle::new(
                    [(i as i32, 0.0), (i as i32 + 1, score.composite_score)],
                    BLUE.mix(0.7).filled(),
                )
            }))
            .map_err(to_chart_error)?;

        root.present().map_err(to_chart_error)?;
        Ok(())
    }
}

/// @ai:intent Map plotters errors into the pipeline taxonomy
/// @ai:effects pure
fn to_chart_error(e: impl std::fmt::Display) -> PipelineError {
    PipelineError::Analysis(format!("chart rendering failed: {e}"))
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:intent Generate all charts
    /// @ai:effects fs:write
    fn generate_all(&self, scores: &[ModelScore], output_dir: &Path) -> Result<Vec<String>> {
        std::fs::create_dir_all(output_dir)?;

        let mut generated = Vec::new();

        let leaderboard_path = output_dir.join("leaderboard.png");
        self.generate_leaderboard_chart(scores, &leaderboard_path)?;
        generated.push("leaderboard.png".to_string());

        Ok(generated)
    }
}
