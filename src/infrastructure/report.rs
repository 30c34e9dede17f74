// ============================================================
// RESULTS REPORT WRITER
// ============================================================
// CSV export mirroring the stored results table

use std::path::Path;

use crate::domain::error::{AppError, Result};
use crate::domain::prediction::PredictionResult;

/// Write a results report as CSV.
pub fn write_report(path: &Path, results: &[PredictionResult]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::IoError(format!("Failed to create report {}: {}", path.display(), e)))?;

    writer
        .write_record([
            "item_id",
            "name",
            "ingredients",
            "allergens_raw",
            "expected",
            "predicted",
            "accuracy",
            "model",
            "latency_ms",
            "ttft_ms",
            "itps",
            "otps",
            "oet_ms",
        ])
        .map_err(|e| AppError::IoError(format!("Failed to write report header: {}", e)))?;

    for result in results {
        writer
            .write_record([
                result.item.id.as_str(),
                result.item.name.as_str(),
                result.item.ingredients.as_str(),
                result.item.allergens_raw.as_str(),
                result.item.allergens_mapped.as_str(),
                result.predicted.as_str(),
                &format!("{:.1}", result.accuracy),
                result.model.as_str(),
                &result.metrics.latency_ms.to_string(),
                &result.metrics.ttft_ms.to_string(),
                &result.metrics.itps.to_string(),
                &result.metrics.otps.to_string(),
                &result.metrics.oet_ms.to_string(),
            ])
            .map_err(|e| AppError::IoError(format!("Failed to write report row: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::IoError(format!("Failed to flush report: {}", e)))?;

    Ok(())
}
