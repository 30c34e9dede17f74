use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum SlmProvider {
    /// llama.cpp-style server exposing /completion with a timings block
    LlamaServer,
    /// Any /chat/completions-compatible endpoint
    OpenAiCompat,
    /// External engine executable reading the prompt on stdin and
    /// writing a metrics-framed response on stdout
    Command,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SlmConfig {
    pub provider: SlmProvider,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Engine executable path, used by the Command provider
    pub command: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for SlmConfig {
    fn default() -> Self {
        Self {
            provider: SlmProvider::LlamaServer,
            base_url: "http://localhost:8080".to_string(),
            model: "qwen2.5-1.5b-instruct-q4_k_m".to_string(),
            api_key: None,
            command: None,
            max_tokens: Some(64),
            temperature: Some(0.0),
        }
    }
}
