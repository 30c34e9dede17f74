use crate::domain::error::{AppError, Result};
use crate::domain::food_item::FoodItem;
use crate::domain::prediction::{InferenceMetrics, PredictionResult};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

const RESULTS_SCHEMA: &str = include_str!("../../resources/results/schema.sql");

pub struct ResultRepository {
    pool: SqlitePool,
}

impl ResultRepository {
    pub async fn connect(db_path: &Path) -> Result<Self> {
        let db_url = db_path_to_url(db_path)?;
        let options = SqliteConnectOptions::from_str(&db_url)
            .map_err(|e| AppError::DatabaseError(format!("Failed to parse results DB URL: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect results DB: {e}")))?;

        let repo = Self { pool };
        repo.apply_schema().await?;
        Ok(repo)
    }

    async fn apply_schema(&self) -> Result<()> {
        for statement in RESULTS_SCHEMA.split(';') {
            let stmt = statement.trim();
            if stmt.is_empty() {
                continue;
            }
            sqlx::query(stmt)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(format!("Failed to apply results schema: {e}"))
                })?;
        }
        Ok(())
    }

    pub async fn insert_result(&self, result: &PredictionResult) -> Result<()> {
        sqlx::query(
            "INSERT INTO prediction_results (id, item_id, item_name, ingredients, allergens_raw, allergens_expected, allergens_predicted, accuracy, model, prompt_digest, latency_ms, ttft_ms, itps, otps, oet_ms, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&result.id)
        .bind(&result.item.id)
        .bind(&result.item.name)
        .bind(&result.item.ingredients)
        .bind(&result.item.allergens_raw)
        .bind(&result.item.allergens_mapped)
        .bind(&result.predicted)
        .bind(result.accuracy)
        .bind(&result.model)
        .bind(&result.prompt_digest)
        .bind(result.metrics.latency_ms)
        .bind(result.metrics.ttft_ms)
        .bind(result.metrics.itps)
        .bind(result.metrics.otps)
        .bind(result.metrics.oet_ms)
        .bind(result.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to insert prediction result: {e}")))?;

        Ok(())
    }

    /// Store a batch of results, counting successes and failures.
    /// A failed insert never aborts the rest of the batch.
    pub async fn save_batch(&self, results: &[PredictionResult]) -> Result<(usize, usize)> {
        let mut success = 0;
        let mut failure = 0;

        for result in results {
            match self.insert_result(result).await {
                Ok(()) => success += 1,
                Err(err) => {
                    failure += 1;
                    warn!(item = %result.item.id, error = %err, "Failed to save prediction result");
                }
            }
        }

        Ok((success, failure))
    }

    pub async fn list_recent(&self, limit: i64) -> Result<Vec<PredictionResult>> {
        let rows = sqlx::query_as::<_, ResultEntity>(
            "SELECT id, item_id, item_name, ingredients, allergens_raw, allergens_expected, allergens_predicted, accuracy, model, prompt_digest, latency_ms, ttft_ms, itps, otps, oet_ms, created_at
             FROM prediction_results ORDER BY created_at DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list prediction results: {e}")))?;

        Ok(rows.into_iter().map(|row| row.into()).collect())
    }

    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM prediction_results")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to count prediction results: {e}")))
    }
}

#[derive(sqlx::FromRow)]
struct ResultEntity {
    id: String,
    item_id: String,
    item_name: String,
    ingredients: String,
    allergens_raw: String,
    allergens_expected: String,
    allergens_predicted: String,
    accuracy: f32,
    model: String,
    prompt_digest: String,
    latency_ms: i64,
    ttft_ms: i64,
    itps: i64,
    otps: i64,
    oet_ms: i64,
    created_at: i64,
}

impl From<ResultEntity> for PredictionResult {
    fn from(row: ResultEntity) -> Self {
        PredictionResult {
            id: row.id,
            item: FoodItem {
                id: row.item_id,
                name: row.item_name,
                ingredients: row.ingredients,
                allergens_raw: row.allergens_raw,
                allergens_mapped: row.allergens_expected,
                link: String::new(),
            },
            predicted: row.allergens_predicted,
            accuracy: row.accuracy,
            metrics: InferenceMetrics {
                latency_ms: row.latency_ms,
                ttft_ms: row.ttft_ms,
                itps: row.itps,
                otps: row.otps,
                oet_ms: row.oet_ms,
            },
            prompt_digest: row.prompt_digest,
            model: row.model,
            created_at: row.created_at,
        }
    }
}

fn db_path_to_url(db_path: &Path) -> Result<String> {
    let db_path_str = db_path.to_str().ok_or_else(|| {
        AppError::DatabaseError("Results database path is not valid UTF-8".to_string())
    })?;
    Ok(format!("sqlite://{}", db_path_str.replace('\\', "/")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::food_item::FoodItem;

    fn sample_result(id: &str) -> PredictionResult {
        PredictionResult {
            id: id.to_string(),
            item: FoodItem::new(
                "42".to_string(),
                "Granola Bar".to_string(),
                "oats, honey, almonds".to_string(),
                "almond".to_string(),
                Some("tree nut".to_string()),
                "https://example.com/42".to_string(),
            ),
            predicted: "tree nut".to_string(),
            accuracy: 100.0,
            metrics: InferenceMetrics {
                latency_ms: 1200,
                ttft_ms: 300,
                itps: 40,
                otps: 11,
                oet_ms: 1100,
            },
            prompt_digest: "abc123".to_string(),
            model: "test-model".to_string(),
            created_at: 1_700_000_000_000,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = ResultRepository::connect(&dir.path().join("results.db"))
            .await
            .unwrap();

        repo.insert_result(&sample_result("r1")).await.unwrap();
        let stored = repo.list_recent(10).await.unwrap();

        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].item.name, "Granola Bar");
        assert_eq!(stored[0].predicted, "tree nut");
        assert_eq!(stored[0].metrics.latency_ms, 1200);
    }

    #[tokio::test]
    async fn test_save_batch_counts() {
        let dir = tempfile::tempdir().unwrap();
        let repo = ResultRepository::connect(&dir.path().join("results.db"))
            .await
            .unwrap();

        let batch = vec![sample_result("r1"), sample_result("r2")];
        let (ok, fail) = repo.save_batch(&batch).await.unwrap();
        assert_eq!((ok, fail), (2, 0));
        assert_eq!(repo.count().await.unwrap(), 2);

        // Duplicate primary key is counted as a failure, not an abort
        let (ok, fail) = repo.save_batch(&batch).await.unwrap();
        assert_eq!((ok, fail), (0, 2));
    }
}
