//! @ai:module:intent Leaderboard types for the contest
//! @ai:module:layer domain
//! @ai:module:public_api ModelScore, MetricMeans
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent Final leaderboard entry for one model
///
/// All `*_norm` fields are min-max normalized onto [0, 1] across the
/// contest, with cost and latency inverted so higher is always better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    pub model_id: String,
    pub cost_norm: f64,
    pub accuracy_norm: f64,
    pub factuality_norm: f64,
    pub safety_norm: f64,
    pub wordcount_norm: f64,
    pub latency_norm: f64,
    pub composite_score: f64,
    pub rank: u32,
}

/// @ai:intent Per-model metric means before normalization
///
/// A metric is `None` when no item for the model carries a value for it;
/// the normalizer maps that to the worst-possible sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricMeans {
    pub cost: Option<f64>,
    pub latency: Option<f64>,
    pub word_count: Option<f64>,
    pub accuracy: Option<f64>,
    pub safety: Option<f64>,
    pub factuality: Option<f64>,
    pub item_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_score_serialization_field_order_is_stable() {
        let score = ModelScore {
            model_id: "model-a".to_string(),
            cost_norm: 1.0,
            accuracy_norm: 0.5,
            factuality_norm: 0.5,
            safety_norm: 0.5,
            wordcount_norm: 0.5,
            latency_norm: 0.0,
            composite_score: 0.55,
            rank: 1,
        };

        let first = serde_json::to_string_pretty(&score).unwrap();
        let second = serde_json::to_string_pretty(&score).unwrap();
        assert_eq!(first, second);
        assert!(first.find("model_id").unwrap() < first.find("composite_score").unwrap());
    }
}
