//! Ollama client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use docqa_core::{
    Embedder, Error, GenerationConfig, GenerationResult, LLMProvider, Result,
};

use crate::config::OllamaConfig;

/// Ollama client for text generation and embeddings
#[derive(Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    client: Client,
    connected: bool,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

impl GenerateOptions {
    fn from_config(config: &GenerationConfig) -> Option<Self> {
        if config.temperature.is_none()
            && config.max_tokens.is_none()
            && config.stop_sequences.is_empty()
        {
            return None;
        }

        Some(Self {
            temperature: config.temperature,
            num_predict: config.max_tokens,
            stop: config.stop_sequences.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaClient {
    /// Create a new Ollama client from configuration
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(request_timeout) = config.request_timeout {
            builder = builder.timeout(request_timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            config,
            client,
            connected: false,
        })
    }

    /// Create a new Ollama client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = OllamaConfig::from_env()?;
        Self::new(config)
    }

    /// Set the model to use for generation
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn error_body(response: reqwest::Response) -> String {
        response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string())
    }

    /// Perform the actual generation request
    async fn perform_generation(&self, prompt: &str, config: &GenerationConfig) -> Result<GenerateResponse> {
        let request_body = GenerateRequest {
            model: &config.model_id,
            prompt,
            stream: false,
            options: GenerateOptions::from_config(config),
        };

        let response = self
            .client
            .post(self.endpoint("generate"))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = Self::error_body(response).await;
            return Err(Error::LLMProvider(format!(
                "Ollama generate request failed with status {}: {}",
                status, error_text
            )));
        }

        response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[async_trait]
impl LLMProvider for OllamaClient {
    async fn connect(&mut self) -> Result<()> {
        let response = self
            .client
            .get(self.endpoint("tags"))
            .send()
            .await
            .map_err(|e| {
                Error::Network(format!(
                    "Could not reach Ollama at {}: {}",
                    self.config.base_url, e
                ))
            })?;

        if !response.status().is_success() {
            return Err(Error::LLMProvider(format!(
                "Ollama health check failed: {}",
                response.status()
            )));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        for wanted in [&self.config.model, &self.config.embedding_model] {
            if !tags.models.iter().any(|m| model_matches(&m.name, wanted)) {
                tracing::warn!(model = %wanted, "model not found on Ollama server; pull it first");
            }
        }

        tracing::debug!(base_url = %self.config.base_url, "connected to Ollama");
        self.connected = true;
        Ok(())
    }

    async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        let config = GenerationConfig {
            model_id: self.config.model.clone(),
            ..Default::default()
        };
        self.generate_with_config(prompt, &config).await
    }

    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        if !self.connected {
            return Err(Error::LLMProvider("Not connected. Call connect() first.".to_string()));
        }

        let generation_future = self.perform_generation(prompt, config);

        let response = match config.timeout {
            Some(limit) => match timeout(limit, generation_future).await {
                Ok(result) => result?,
                Err(_) => return Err(Error::Timeout("Request timed out".to_string())),
            },
            None => generation_future.await?,
        };

        Ok(GenerationResult {
            text: response.response,
            model_id: config.model_id.clone(),
            tokens_used: response.eval_count,
        })
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.connected = false;
        Ok(())
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl Embedder for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if !self.connected {
            return Err(Error::Embedding("Not connected. Call connect() first.".to_string()));
        }

        let request_body = EmbeddingRequest {
            model: &self.config.embedding_model,
            prompt: text,
        };

        let response = self
            .client
            .post(self.endpoint("embeddings"))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = Self::error_body(response).await;
            return Err(Error::Embedding(format!(
                "Ollama embeddings request failed with status {}: {}",
                status, error_text
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        if body.embedding.is_empty() {
            return Err(Error::Embedding(format!(
                "Empty embedding returned by model '{}'",
                self.config.embedding_model
            )));
        }

        Ok(body.embedding)
    }

    fn embedding_model(&self) -> &str {
        &self.config.embedding_model
    }
}

/// Ollama lists models with a tag; an untagged name means `:latest`
fn model_matches(listed: &str, wanted: &str) -> bool {
    if listed == wanted {
        return true;
    }
    let with_latest = |name: &str| {
        if name.contains(':') {
            name.to_string()
        } else {
            format!("{}:latest", name)
        }
    };
    with_latest(listed) == with_latest(wanted)
}
