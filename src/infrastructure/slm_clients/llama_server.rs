use super::SlmClient;
use crate::domain::error::{AppError, Result};
use crate::domain::prediction::{InferenceMetrics, SlmResponse};
use crate::domain::slm_config::SlmConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct CompletionRequest {
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    n_predict: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    content: String,
    timings: Option<Timings>,
}

#[derive(Deserialize)]
struct Timings {
    prompt_ms: Option<f64>,
    prompt_per_second: Option<f64>,
    predicted_ms: Option<f64>,
    predicted_per_second: Option<f64>,
}

pub struct LlamaServerClient {
    client: reqwest::Client,
}

impl LlamaServerClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

impl Default for LlamaServerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SlmClient for LlamaServerClient {
    async fn generate(&self, config: &SlmConfig, system: &str, user: &str) -> Result<SlmResponse> {
        let base_url = config.base_url.trim_end_matches('/');
        let url = format!("{}/completion", base_url);

        let mut prompt = String::new();
        if !system.trim().is_empty() {
            prompt.push_str(system);
            prompt.push_str("\n\n");
        }
        prompt.push_str(user);

        let body = CompletionRequest {
            prompt,
            n_predict: config.max_tokens,
            temperature: config.temperature,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLMError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLMError(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::LLMError(format!("Failed to parse JSON: {}", e)))?;

        let mut metrics = InferenceMetrics::default();
        if let Some(timings) = json.timings {
            if let Some(prompt_ms) = timings.prompt_ms {
                metrics.ttft_ms = prompt_ms.round() as i64;
            }
            if let Some(itps) = timings.prompt_per_second {
                metrics.itps = itps.round() as i64;
            }
            if let Some(otps) = timings.predicted_per_second {
                metrics.otps = otps.round() as i64;
            }
            if let (Some(prompt_ms), Some(predicted_ms)) =
                (timings.prompt_ms, timings.predicted_ms)
            {
                metrics.oet_ms = (prompt_ms + predicted_ms).round() as i64;
            }
        }

        Ok(SlmResponse::new(json.content, metrics))
    }
}
