//! LLM provider trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

/// Default generation model
pub const DEFAULT_MODEL: &str = "llama3.2-vision:latest";

/// Configuration for text generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub stop_sequences: Vec<String>,
    /// No timeout when `None`; the call blocks until the model answers.
    pub timeout: Option<Duration>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
            stop_sequences: Vec::new(),
            timeout: None,
        }
    }
}

/// Result of a text generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub model_id: String,
    pub tokens_used: Option<u32>,
}

/// Trait for LLM providers (e.g. Ollama)
///
/// Implementations are explicit handles: construct them, call `connect` before
/// generating and `shutdown` once the process is done with them.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Connect to the LLM provider
    async fn connect(&mut self) -> Result<()>;

    /// Generate text using the LLM with default configuration
    async fn generate(&self, prompt: &str) -> Result<GenerationResult>;

    /// Generate text with custom configuration
    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult>;

    /// Release the connection
    async fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
