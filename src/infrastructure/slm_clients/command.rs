use super::SlmClient;
use crate::domain::error::{AppError, Result};
use crate::domain::prediction::SlmResponse;
use crate::domain::slm_config::SlmConfig;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

const ENGINE_TIMEOUT: Duration = Duration::from_secs(300);

/// Client for an external engine executable.
///
/// The engine reads the prompt on stdin and writes a single response on
/// stdout, optionally framed as `TTFT_MS=..;ITPS=..;OTPS=..;OET_MS=..|text`.
pub struct CommandClient;

impl CommandClient {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CommandClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SlmClient for CommandClient {
    async fn generate(&self, config: &SlmConfig, system: &str, user: &str) -> Result<SlmResponse> {
        let program = config.command.as_deref().ok_or_else(|| {
            AppError::ConfigError("Command provider requires model.command".to_string())
        })?;

        let mut child = Command::new(program)
            .arg("--model")
            .arg(&config.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| AppError::LLMError(format!("Failed to spawn engine {}: {}", program, e)))?;

        let mut prompt = String::new();
        if !system.trim().is_empty() {
            prompt.push_str(system);
            prompt.push_str("\n\n");
        }
        prompt.push_str(user);

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .await
                .map_err(|e| AppError::LLMError(format!("Failed to write prompt: {}", e)))?;
            // Dropping stdin closes the pipe so the engine sees EOF
        }

        let output = timeout(ENGINE_TIMEOUT, child.wait_with_output())
            .await
            .map_err(|_| AppError::LLMError("Engine timed out".to_string()))?
            .map_err(|e| AppError::LLMError(format!("Engine failed: {}", e)))?;

        if !output.status.success() {
            return Err(AppError::LLMError(format!(
                "Engine exited with status {}",
                output.status
            )));
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        Ok(SlmResponse::from_framed(raw.trim()))
    }
}
