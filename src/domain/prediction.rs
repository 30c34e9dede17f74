// ============================================================
// PREDICTION TYPES
// ============================================================
// Inference timing metadata and per-item prediction records

use serde::{Deserialize, Serialize};

use crate::domain::food_item::FoodItem;

/// Timing metadata for one inference call.
///
/// Engine-reported fields are negative when the engine did not report them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InferenceMetrics {
    /// Wall-clock latency of the whole call, measured by the harness
    pub latency_ms: i64,

    /// Time to first token
    pub ttft_ms: i64,

    /// Input tokens per second
    pub itps: i64,

    /// Output tokens per second
    pub otps: i64,

    /// Overall engine time
    pub oet_ms: i64,
}

impl Default for InferenceMetrics {
    fn default() -> Self {
        Self {
            latency_ms: -1,
            ttft_ms: -1,
            itps: -1,
            otps: -1,
            oet_ms: -1,
        }
    }
}

/// Output of one engine call: free-form text plus timing metadata.
#[derive(Debug, Clone)]
pub struct SlmResponse {
    pub text: String,
    pub metrics: InferenceMetrics,
}

impl SlmResponse {
    pub fn new(text: String, metrics: InferenceMetrics) -> Self {
        Self { text, metrics }
    }

    /// Decode the `KEY=value;...|text` frame the engine wrapper emits.
    ///
    /// Text without a metadata segment passes through unchanged with default
    /// metrics, so a plain response is never mistaken for an empty one.
    pub fn from_framed(raw: &str) -> Self {
        let (meta, text) = match raw.split_once('|') {
            Some((meta, text)) if looks_like_meta(meta) => (meta, text),
            _ => return Self::new(raw.to_string(), InferenceMetrics::default()),
        };

        let mut metrics = InferenceMetrics::default();
        for entry in meta.split(';') {
            let Some((key, value)) = entry.split_once('=') else {
                continue;
            };
            let value = value.trim().parse::<i64>().unwrap_or(-1);
            match key.trim() {
                "TTFT_MS" => metrics.ttft_ms = value,
                "ITPS" => metrics.itps = value,
                "OTPS" => metrics.otps = value,
                "OET_MS" => metrics.oet_ms = value,
                _ => {}
            }
        }

        Self::new(text.to_string(), metrics)
    }
}

fn looks_like_meta(segment: &str) -> bool {
    segment
        .split(';')
        .any(|entry| matches!(entry.split('=').next().map(str::trim), Some("TTFT_MS" | "ITPS" | "OTPS" | "OET_MS")))
}

/// One scored prediction for a food item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub id: String,
    pub item: FoodItem,

    /// Comma-joined detected allergens, or the EMPTY sentinel
    pub predicted: String,

    /// F1-based accuracy against the expected label, 0..=100
    pub accuracy: f32,

    pub metrics: InferenceMetrics,

    /// SHA-256 digest of the prompt that produced this prediction
    pub prompt_digest: String,

    pub model: String,
    pub created_at: i64,
}
