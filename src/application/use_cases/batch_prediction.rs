//! Batch prediction run
//!
//! Iterates a dataset through the inference engine, scores each item, and
//! persists the results. A failed call marks the item failed and the run
//! continues.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::use_cases::evaluation::{item_accuracy, BatchSummary};
use crate::application::use_cases::hashing::hash_prompt;
use crate::application::use_cases::label_extractor::extract_labels;
use crate::application::use_cases::prompt_builder::PromptBuilder;
use crate::domain::error::Result;
use crate::domain::food_item::{Dataset, FoodItem};
use crate::domain::prediction::{InferenceMetrics, PredictionResult};
use crate::domain::slm_config::SlmConfig;
use crate::domain::vocabulary::ControlledVocabulary;
use crate::infrastructure::db::ResultRepository;
use crate::infrastructure::slm_clients::SlmClient;

/// Outcome of one batch run.
#[derive(Debug)]
pub struct BatchReport {
    pub dataset_name: String,
    pub results: Vec<PredictionResult>,
    pub summary: BatchSummary,
    /// Results persisted / persistence failures
    pub saved: usize,
    pub save_failed: usize,
}

pub struct BatchPredictionUseCase {
    client: Arc<dyn SlmClient + Send + Sync>,
    repository: Arc<ResultRepository>,
}

impl BatchPredictionUseCase {
    pub fn new(
        client: Arc<dyn SlmClient + Send + Sync>,
        repository: Arc<ResultRepository>,
    ) -> Self {
        Self { client, repository }
    }

    /// Predict allergens for one ad-hoc ingredient list. Not persisted.
    pub async fn predict_ingredients(
        &self,
        config: &SlmConfig,
        ingredients: &str,
    ) -> Result<(String, InferenceMetrics)> {
        let vocabulary = ControlledVocabulary::standard();
        let prompt = PromptBuilder::new(vocabulary).build(ingredients);

        let started = Instant::now();
        let response = self.client.generate(config, "", &prompt).await?;
        let mut metrics = response.metrics;
        metrics.latency_ms = started.elapsed().as_millis() as i64;

        Ok((extract_labels(&response.text, vocabulary), metrics))
    }

    /// Predict and score one dataset item.
    pub async fn predict_item(
        &self,
        config: &SlmConfig,
        item: &FoodItem,
    ) -> Result<PredictionResult> {
        let vocabulary = ControlledVocabulary::standard();
        let prompt = PromptBuilder::new(vocabulary).build(&item.ingredients);

        let started = Instant::now();
        let response = self.client.generate(config, "", &prompt).await?;
        let mut metrics = response.metrics;
        metrics.latency_ms = started.elapsed().as_millis() as i64;

        let predicted = extract_labels(&response.text, vocabulary);
        let accuracy = item_accuracy(&item.allergens_mapped, &predicted);

        Ok(PredictionResult {
            id: Uuid::new_v4().to_string(),
            item: item.clone(),
            predicted,
            accuracy,
            metrics,
            prompt_digest: hash_prompt(&prompt, &config.model),
            model: config.model.clone(),
            created_at: Utc::now().timestamp_millis(),
        })
    }

    /// Run the whole dataset and persist the results.
    pub async fn run_batch(
        &self,
        config: &SlmConfig,
        dataset: &Dataset,
        delay_ms: u64,
    ) -> Result<BatchReport> {
        let total = dataset.len();
        info!(dataset = %dataset.name, total, model = %config.model, "Starting batch prediction");

        let mut results = Vec::with_capacity(total);
        let mut failed = 0usize;

        for (index, item) in dataset.items.iter().enumerate() {
            info!(item = %item.name, "Processing {}/{}", index + 1, total);

            match self.predict_item(config, item).await {
                Ok(result) => {
                    info!(
                        item = %item.name,
                        predicted = %result.predicted,
                        accuracy = result.accuracy,
                        latency_ms = result.metrics.latency_ms,
                        "Prediction complete"
                    );
                    results.push(result);
                }
                Err(err) => {
                    failed += 1;
                    warn!(item = %item.name, error = %err, "Prediction failed");
                }
            }

            if delay_ms > 0 && index + 1 < total {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }

        let (saved, save_failed) = self.repository.save_batch(&results).await?;
        let summary = BatchSummary::from_results(&results, failed);

        info!(
            dataset = %dataset.name,
            succeeded = summary.succeeded,
            failed = summary.failed,
            exact_matches = summary.exact_matches,
            mean_accuracy = summary.mean_accuracy,
            saved,
            save_failed,
            "Batch complete"
        );

        Ok(BatchReport {
            dataset_name: dataset.name.clone(),
            results,
            summary,
            saved,
            save_failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use crate::domain::prediction::SlmResponse;
    use async_trait::async_trait;

    /// Test double answering from the ingredient text itself.
    struct EchoClient;

    #[async_trait]
    impl SlmClient for EchoClient {
        async fn generate(
            &self,
            _config: &SlmConfig,
            _system: &str,
            user: &str,
        ) -> Result<SlmResponse> {
            if user.contains("unreachable") {
                return Err(AppError::LLMError("engine offline".to_string()));
            }
            // Echo the ingredients line back as the "model output"
            let answer = user
                .lines()
                .nth(3)
                .unwrap_or_default()
                .to_string();
            Ok(SlmResponse::new(answer, InferenceMetrics::default()))
        }
    }

    fn item(id: &str, ingredients: &str, expected: &str) -> FoodItem {
        FoodItem::new(
            id.to_string(),
            format!("Item {}", id),
            ingredients.to_string(),
            expected.to_string(),
            Some(expected.to_string()),
            String::new(),
        )
    }

    async fn use_case(dir: &std::path::Path) -> BatchPredictionUseCase {
        let repository = ResultRepository::connect(&dir.join("results.db"))
            .await
            .unwrap();
        BatchPredictionUseCase::new(Arc::new(EchoClient), Arc::new(repository))
    }

    #[tokio::test]
    async fn test_run_batch_scores_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = use_case(dir.path()).await;

        let dataset = Dataset::new(
            "test".to_string(),
            vec![
                item("1", "milk solids, wheat flour", "milk, wheat"),
                item("2", "spring water", "EMPTY"),
            ],
        );

        let report = use_case
            .run_batch(&SlmConfig::default(), &dataset, 0)
            .await
            .unwrap();

        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.failed, 0);
        assert_eq!(report.summary.exact_matches, 2);
        assert_eq!(report.saved, 2);
        assert_eq!(report.results[0].predicted, "milk, wheat");
        assert_eq!(report.results[1].predicted, "EMPTY");
    }

    #[tokio::test]
    async fn test_failed_item_does_not_abort_batch() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = use_case(dir.path()).await;

        let dataset = Dataset::new(
            "test".to_string(),
            vec![
                item("1", "unreachable", "EMPTY"),
                item("2", "peanut butter", "peanut"),
            ],
        );

        let report = use_case
            .run_batch(&SlmConfig::default(), &dataset, 0)
            .await
            .unwrap();

        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.succeeded, 1);
        assert_eq!(report.results[0].predicted, "peanut");
    }

    #[tokio::test]
    async fn test_predict_ingredients_renders_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = use_case(dir.path()).await;

        let (predicted, _) = use_case
            .predict_ingredients(&SlmConfig::default(), "plain rice")
            .await
            .unwrap();
        assert_eq!(predicted, "EMPTY");
    }
}
