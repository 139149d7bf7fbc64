//! Ollama configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

use docqa_core::{Error, Result, DEFAULT_EMBEDDING_MODEL, DEFAULT_MODEL};

/// Default Ollama server address
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

const DEFAULT_PORT: u16 = 11434;

/// Configuration for the Ollama client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub embedding_model: String,
    pub request_timeout: Option<Duration>,
}

impl OllamaConfig {
    /// Create configuration with default values
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            request_timeout: None,
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(base_url) = lookup("OLLAMA_BASE_URL") {
            config = config.with_base_url(base_url)?;
        } else if let Some(host) = lookup("OLLAMA_HOST") {
            config = config.with_base_url(host_to_base_url(&host))?;
        }

        if let Some(model) = lookup("DOCQA_MODEL") {
            config.model = model;
        }

        if let Some(model) = lookup("DOCQA_EMBEDDING_MODEL") {
            config.embedding_model = model;
        }

        if let Some(secs) = lookup("DOCQA_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::Configuration(format!(
                    "DOCQA_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    secs
                ))
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Set the server address, validating it as an http(s) URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let parsed = Url::parse(&base_url)
            .map_err(|e| Error::Configuration(format!("Invalid Ollama URL '{}': {}", base_url, e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(Error::Configuration(format!(
                "Ollama URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Set the generation model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the embedding model
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Set a request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

/// Expand an `OLLAMA_HOST` value such as `0.0.0.0` or `127.0.0.1:11434` into a URL.
/// Values that already carry a scheme are returned unchanged.
fn host_to_base_url(host: &str) -> String {
    let host = host.trim();
    if host.contains("://") {
        return host.to_string();
    }

    let (authority, path) = match host.find('/') {
        Some(idx) => host.split_at(idx),
        None => (host, ""),
    };
    // Skip past an IPv6 literal before looking for the port separator
    let after_address = authority.rsplit_once(']').map_or(authority, |(_, rest)| rest);

    if after_address.contains(':') {
        format!("http://{}{}", authority, path)
    } else {
        format!("http://{}:{}{}", authority, DEFAULT_PORT, path)
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::new()
    }
}
