//! @ai:module:intent Group, average, normalize and rank contest metrics
//! @ai:module:layer application
//! @ai:module:public_api ContestRanker, missing_models
//! @ai:module:stateless true

use crate::config::ScoreWeights;
use crate::contest::normalizer::{MetricBounds, MetricDirection};
use crate::contest::types::{MetricMeans, ModelScore};
use crate::error::{PipelineError, Result};
use crate::store::ContentItem;

/// @ai:intent Produces the ranked leaderboard from judged content items
pub struct ContestRanker {
    weights: ScoreWeights,
}

impl ContestRanker {
    /// @ai:intent Create a ranker, rejecting weights that do not sum to 1.0
    /// @ai:effects pure
    pub fn new(weights: ScoreWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    /// @ai:intent Rank all models by weighted composite score
    ///
    /// Ties are broken by accuracy_norm descending, then model_id
    /// ascending, so output is reproducible across runs.
    /// @ai:effects pure
    pub fn rank(&self, items: &[ContentItem]) -> Result<Vec<ModelScore>> {
        if items.is_empty() {
            return Err(PipelineError::MissingData(
                "no content items to rank".to_string(),
            ));
        }

        let groups = group_by_model(items);
        let means: Vec<(String, MetricMeans)> = groups
            .into_iter()
            .map(|(model_id, group)| {
                let m = compute_means(&group);
                (model_id, m)
            })
            .collect();

        let cost_bounds = bounds_of(&means, |m| m.cost);
        let latency_bounds = bounds_of(&means, |m| m.latency);
        let word_count_bounds = bounds_of(&means, |m| m.word_count);
        let accuracy_bounds = bounds_of(&means, |m| m.accuracy);
        let safety_bounds = bounds_of(&means, |m| m.safety);
        let factuality_bounds = bounds_of(&means, |m| m.factuality);

        let mut scores: Vec<ModelScore> = means
            .iter()
            .map(|(model_id, m)| {
                let cost_norm = normalize_or_sentinel(
                    m.cost,
                    cost_bounds,
                    MetricDirection::LowerIsBetter,
                    model_id,
                    "cost",
                );
                let latency_norm = normalize_or_sentinel(
                    m.latency,
                    latency_bounds,
                    MetricDirection::LowerIsBetter,
                    model_id,
                    "latency",
                );
                let wordcount_norm = normalize_or_sentinel(
                    m.word_count,
                    word_count_bounds,
                    MetricDirection::HigherIsBetter,
                    model_id,
                    "word_count",
                );
                let accuracy_norm = normalize_or_sentinel(
                    m.accuracy,
                    accuracy_bounds,
                    MetricDirection::HigherIsBetter,
                    model_id,
                    "accuracy",
                );
                let safety_norm = normalize_or_sentinel(
                    m.safety,
                    safety_bounds,
                    MetricDirection::HigherIsBetter,
                    model_id,
                    "safety",
                );
                let factuality_norm = normalize_or_sentinel(
                    m.factuality,
                    factuality_bounds,
                    MetricDirection::HigherIsBetter,
                    model_id,
                    "factuality",
                );

                let composite_score = self.weights.cost * cost_norm
                    + self.weights.accuracy * accuracy_norm
                    + self.weights.factuality * factuality_norm
                    + self.weights.safety * safety_norm
                    + self.weights.word_count * wordcount_norm
                    + self.weights.latency * latency_norm;

                ModelScore {
                    model_id: model_id.clone(),
                    cost_norm,
                    accuracy_norm,
                    factuality_norm,
                    safety_norm,
                    wordcount_norm,
                    latency_norm,
                    composite_score,
                    rank: 0,
                }
            })
            .collect();

        scores.sort_by(|a, b| {
            b.composite_score
                .total_cmp(&a.composite_score)
                .then(b.accuracy_norm.total_cmp(&a.accuracy_norm))
                .then(a.model_id.cmp(&b.model_id))
        });

        for (index, score) in scores.iter_mut().enumerate() {
            score.rank = index as u32 + 1;
        }

        Ok(scores)
    }
}

/// @ai:intent Group items by model, preserving first-appearance order
/// @ai:effects pure
fn group_by_model(items: &[ContentItem]) -> Vec<(String, Vec<&ContentItem>)> {
    let mut groups: Vec<(String, Vec<&ContentItem>)> = Vec::new();

    for item in items {
        match groups.iter_mut().find(|(id, _)| *id == item.model_id) {
            Some((_, group)) => group.push(item),
            None => groups.push((item.model_id.clone(), vec![item])),
        }
    }

    groups
}

/// @ai:intent Mean of each metric over a model's items
/// @ai:effects pure
fn compute_means(items: &[&ContentItem]) -> MetricMeans {
    MetricMeans {
        cost: mean(items.iter().map(|i| i.cost)),
        latency: mean(items.iter().map(|i| i.latency as f64)),
        word_count: mean(items.iter().filter_map(|i| i.word_count.map(|w| w as f64))),
        accuracy: mean(items.iter().filter_map(|i| i.accuracy)),
        safety: mean(items.iter().filter_map(|i| i.safety)),
        factuality: mean(items.iter().filter_map(|i| i.factuality)),
        item_count: items.len(),
    }
}

/// @ai:intent Mean of an iterator; None when it is empty
/// @ai:effects pure
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// @ai:intent Bounds of one metric across models that have a value for it
/// @ai:effects pure
fn bounds_of(
    means: &[(String, MetricMeans)],
    metric: impl Fn(&MetricMeans) -> Option<f64>,
) -> Option<MetricBounds> {
    MetricBounds::from_values(means.iter().filter_map(|(_, m)| metric(m)))
}

/// @ai:intent Normalize, or fall back to the worst-possible sentinel 0.0
/// @ai:effects pure
fn normalize_or_sentinel(
    value: Option<f64>,
    bounds: Option<MetricBounds>,
    direction: MetricDirection,
    model_id: &str,
    metric: &str,
) -> f64 {
    match (value, bounds) {
        (Some(v), Some(b)) => b.normalize(v, direction),
        _ => {
            tracing::warn!(
                "Model {} has no {} values; scoring it 0.0 for that metric",
                model_id,
                metric
            );
            0.0
        }
    }
}

/// @ai:intent Configured models that never reached the ranking stage
/// @ai:effects pure
pub fn missing_models(expected: &[String], items: &[ContentItem]) -> Vec<String> {
    expected
        .iter()
        .filter(|id| !items.iter().any(|item| item.model_id == **id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn judged_item(
        model_id: &str,
        prompt_id: &str,
        cost: f64,
        accuracy: f64,
        factuality: f64,
        safety: f64,
        word_count: u64,
        latency: u64,
    ) -> ContentItem {
        ContentItem {
            model_id: model_id.to_string(),
            prompt_id: prompt_id.to_string(),
            text: "article".to_string(),
            prompt_tokens: 10,
            completion_tokens: 20,
            cost,
            latency,
            word_count: Some(word_count),
            broken_links: Some(vec![]),
            accuracy: Some(accuracy),
            safety: Some(safety),
            factuality: Some(factuality),
            tone: Some("neutral".to_string()),
        }
    }

    fn two_model_contest() -> Vec<ContentItem> {
        vec![
            judged_item("model-a", "P1", 10.0, 90.0, 80.0, 95.0, 500, 2),
            judged_item("model-b", "P1", 5.0, 70.0, 60.0, 90.0, 400, 1),
        ]
    }

    #[test]
    fn test_two_model_scenario() {
        let ranker = ContestRanker::new(ScoreWeights::default()).unwrap();
        let scores = ranker.rank(&two_model_contest()).unwrap();

        let a = scores.iter().find(|s| s.model_id == "model-a").unwrap();
        let b = scores.iter().find(|s| s.model_id == "model-b").unwrap();

        // B wins the inverted metrics, A wins everything else.
        assert_eq!(b.cost_norm, 1.0);
        assert_eq!(b.latency_norm, 1.0);
        assert_eq!(a.cost_norm, 0.0);
        assert_eq!(a.latency_norm, 0.0);
        assert_eq!(a.accuracy_norm, 1.0);
        assert_eq!(a.factuality_norm, 1.0);
        assert_eq!(a.safety_norm, 1.0);
        assert_eq!(a.wordcount_norm, 1.0);

        assert!((a.composite_score - 0.65).abs() < 1e-9);
        assert!((b.composite_score - 0.35).abs() < 1e-9);

        assert_eq!(scores[0].model_id, "model-a");
        assert_eq!(scores[0].rank, 1);
        assert_eq!(scores[1].rank, 2);
    }

    #[test]
    fn test_means_are_averaged_across_prompts() {
        let items = vec![
            judged_item("model-a", "P1", 2.0, 80.0, 80.0, 80.0, 400, 10),
            judged_item("model-a", "P2", 4.0, 90.0, 80.0, 80.0, 600, 30),
            judged_item("model-b", "P1", 1.0, 50.0, 50.0, 50.0, 100, 5),
            judged_item("model-b", "P2", 1.0, 50.0, 50.0, 50.0, 100, 5),
        ];

        let groups = group_by_model(&items);
        let means = compute_means(&groups[0].1);
        assert_eq!(means.cost, Some(3.0));
        assert_eq!(means.accuracy, Some(85.0));
        assert_eq!(means.word_count, Some(500.0));
        assert_eq!(means.latency, Some(20.0));
        assert_eq!(means.item_count, 2);
    }

    #[test]
    fn test_no_variance_scores_one_for_everyone() {
        let items = vec![
            judged_item("model-a", "P1", 5.0, 80.0, 70.0, 90.0, 500, 10),
            judged_item("model-b", "P1", 5.0, 60.0, 70.0, 90.0, 300, 10),
        ];

        let ranker = ContestRanker::new(ScoreWeights::default()).unwrap();
        let scores = ranker.rank(&items).unwrap();

        for score in &scores {
            assert_eq!(score.cost_norm, 1.0);
            assert_eq!(score.factuality_norm, 1.0);
            assert_eq!(score.safety_norm, 1.0);
            assert_eq!(score.latency_norm, 1.0);
        }
    }

    #[test]
    fn test_missing_metric_gets_sentinel_zero() {
        let mut without_judgment = judged_item("model-b", "P1", 5.0, 0.0, 0.0, 0.0, 300, 10);
        without_judgment.accuracy = None;
        without_judgment.safety = None;
        without_judgment.factuality = None;

        let items = vec![
            judged_item("model-a", "P1", 10.0, 80.0, 70.0, 90.0, 500, 20),
            without_judgment,
        ];

        let ranker = ContestRanker::new(ScoreWeights::default()).unwrap();
        let scores = ranker.rank(&items).unwrap();

        let b = scores.iter().find(|s| s.model_id == "model-b").unwrap();
        assert_eq!(b.accuracy_norm, 0.0);
        assert_eq!(b.safety_norm, 0.0);
        assert_eq!(b.factuality_norm, 0.0);
        // Single-value bounds have no variance, so the only holder gets 1.0.
        let a = scores.iter().find(|s| s.model_id == "model-a").unwrap();
        assert_eq!(a.accuracy_norm, 1.0);
    }

    #[test]
    fn test_empty_input_is_missing_data() {
        let ranker = ContestRanker::new(ScoreWeights::default()).unwrap();
        let err = ranker.rank(&[]).unwrap_err();
        assert!(matches!(err, PipelineError::MissingData(_)));
    }

    #[test]
    fn test_identical_models_rank_deterministically() {
        let items = vec![
            judged_item("model-b", "P1", 5.0, 80.0, 70.0, 90.0, 500, 10),
            judged_item("model-a", "P1", 5.0, 80.0, 70.0, 90.0, 500, 10),
        ];

        let ranker = ContestRanker::new(ScoreWeights::default()).unwrap();
        let scores = ranker.rank(&items).unwrap();

        // Same composite, same accuracy: the tie falls through to model_id.
        assert_eq!(scores[0].composite_score, scores[1].composite_score);
        assert_eq!(scores[0].model_id, "model-a");
        assert_eq!(scores[1].model_id, "model-b");
    }

    #[test]
    fn test_rerank_is_byte_identical() {
        let ranker = ContestRanker::new(ScoreWeights::default()).unwrap();
        let items = two_model_contest();

        let first = serde_json::to_string_pretty(&ranker.rank(&items).unwrap()).unwrap();
        let second = serde_json::to_string_pretty(&ranker.rank(&items).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let weights = ScoreWeights {
            cost: 0.9,
            ..Default::default()
        };
        assert!(ContestRanker::new(weights).is_err());
    }

    #[test]
    fn test_missing_models_reported() {
        let expected = vec!["model-a".to_string(), "model-c".to_string()];
        let items = two_model_contest();

        let missing = missing_models(&expected, &items);
        assert_eq!(missing, vec!["model-c".to_string()]);
    }
}
