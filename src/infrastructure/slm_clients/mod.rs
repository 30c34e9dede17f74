pub mod command;
pub mod llama_server;
pub mod openai_compat;

use crate::domain::error::Result;
use crate::domain::prediction::SlmResponse;
use crate::domain::slm_config::{SlmConfig, SlmProvider};
use async_trait::async_trait;
use command::CommandClient;
use llama_server::LlamaServerClient;
use openai_compat::OpenAiCompatClient;

/// Opaque inference collaborator. Implementations only move text in and out;
/// tokenization, sampling, and tensor math live behind this boundary.
#[async_trait]
pub trait SlmClient {
    async fn generate(&self, config: &SlmConfig, system: &str, user: &str) -> Result<SlmResponse>;
}

pub struct RouterClient {
    llama: LlamaServerClient,
    openai: OpenAiCompatClient,
    command: CommandClient,
}

impl RouterClient {
    pub fn new() -> Self {
        Self {
            llama: LlamaServerClient::new(),
            openai: OpenAiCompatClient::new(),
            command: CommandClient::new(),
        }
    }
}

impl Default for RouterClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SlmClient for RouterClient {
    async fn generate(&self, config: &SlmConfig, system: &str, user: &str) -> Result<SlmResponse> {
        match config.provider {
            SlmProvider::LlamaServer => self.llama.generate(config, system, user).await,
            SlmProvider::OpenAiCompat => self.openai.generate(config, system, user).await,
            SlmProvider::Command => self.command.generate(config, system, user).await,
        }
    }
}
