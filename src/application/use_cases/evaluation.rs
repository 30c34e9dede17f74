//! Scoring of predicted versus expected allergen labels

use serde::{Deserialize, Serialize};

use crate::domain::food_item::normalize_terms;
use crate::domain::prediction::PredictionResult;

/// F1-based accuracy between expected and predicted label strings, 0..=100.
///
/// Both labels are normalized (lowercased, trimmed, empty/"empty" entries
/// removed) before comparison. Two empty sets agree perfectly; exactly one
/// empty set scores zero.
pub fn item_accuracy(expected_label: &str, predicted_label: &str) -> f32 {
    let expected = term_set(expected_label);
    let predicted = term_set(predicted_label);

    if expected.is_empty() && predicted.is_empty() {
        return 100.0;
    }
    if expected.is_empty() || predicted.is_empty() {
        return 0.0;
    }

    let true_positives = expected.iter().filter(|t| predicted.contains(t)).count();

    let precision = true_positives as f32 / predicted.len() as f32;
    let recall = true_positives as f32 / expected.len() as f32;

    if precision + recall == 0.0 {
        return 0.0;
    }

    (2.0 * precision * recall) / (precision + recall) * 100.0
}

/// Normalized terms with set semantics: repeated labels count once.
fn term_set(label: &str) -> Vec<String> {
    let mut terms = normalize_terms(label);
    terms.sort();
    terms.dedup();
    terms
}

/// Aggregate figures for one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub exact_matches: usize,
    pub mean_accuracy: f32,
    pub mean_latency_ms: f32,
}

impl BatchSummary {
    pub fn from_results(results: &[PredictionResult], failed: usize) -> Self {
        let succeeded = results.len();
        let total = succeeded + failed;

        let exact_matches = results.iter().filter(|r| r.accuracy >= 100.0).count();

        let mean_accuracy = if succeeded == 0 {
            0.0
        } else {
            results.iter().map(|r| r.accuracy).sum::<f32>() / succeeded as f32
        };

        let timed: Vec<i64> = results
            .iter()
            .map(|r| r.metrics.latency_ms)
            .filter(|&ms| ms >= 0)
            .collect();
        let mean_latency_ms = if timed.is_empty() {
            0.0
        } else {
            timed.iter().sum::<i64>() as f32 / timed.len() as f32
        };

        Self {
            total,
            succeeded,
            failed,
            exact_matches,
            mean_accuracy,
            mean_latency_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_empty_is_full_score() {
        assert_eq!(item_accuracy("EMPTY", "EMPTY"), 100.0);
        assert_eq!(item_accuracy("", ""), 100.0);
    }

    #[test]
    fn test_one_empty_is_zero() {
        assert_eq!(item_accuracy("milk", "EMPTY"), 0.0);
        assert_eq!(item_accuracy("EMPTY", "milk"), 0.0);
    }

    #[test]
    fn test_exact_match_is_full_score() {
        assert_eq!(item_accuracy("milk, soy", "soy, milk"), 100.0);
        assert_eq!(item_accuracy("Milk", "milk"), 100.0);
    }

    #[test]
    fn test_repeated_labels_count_once() {
        assert_eq!(item_accuracy("milk, milk", "milk"), 100.0);
    }

    #[test]
    fn test_disjoint_sets_score_zero() {
        assert_eq!(item_accuracy("milk", "soy"), 0.0);
    }

    #[test]
    fn test_partial_overlap_is_f1() {
        // expected {milk, soy}, predicted {milk}: p=1, r=0.5, f1=2/3
        let score = item_accuracy("milk, soy", "milk");
        assert!((score - 66.666_67).abs() < 0.01);
    }

    #[test]
    fn test_summary_aggregates() {
        use crate::domain::food_item::FoodItem;
        use crate::domain::prediction::InferenceMetrics;

        let result = |accuracy: f32, latency: i64| PredictionResult {
            id: "r".to_string(),
            item: FoodItem::new(
                "1".to_string(),
                "x".to_string(),
                "x".to_string(),
                "milk".to_string(),
                None,
                String::new(),
            ),
            predicted: "milk".to_string(),
            accuracy,
            metrics: InferenceMetrics {
                latency_ms: latency,
                ..Default::default()
            },
            prompt_digest: String::new(),
            model: "m".to_string(),
            created_at: 0,
        };

        let results = vec![result(100.0, 1000), result(50.0, 2000)];
        let summary = BatchSummary::from_results(&results, 1);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.exact_matches, 1);
        assert!((summary.mean_accuracy - 75.0).abs() < f32::EPSILON);
        assert!((summary.mean_latency_ms - 1500.0).abs() < f32::EPSILON);
    }
}
