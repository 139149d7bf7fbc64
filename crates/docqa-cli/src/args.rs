//! Command-line arguments shared by both binaries

use clap::Parser;
use std::path::PathBuf;

use docqa_ollama::OllamaConfig;
use docqa_rag::{PipelineOptions, PromptStyle};

use crate::Result;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Ask questions about a PDF using a local Ollama model", long_about = None)]
pub struct Args {
    /// PDF file to answer questions about
    pub pdf_path: Option<PathBuf>,

    /// Generation model (overrides DOCQA_MODEL)
    #[arg(long)]
    pub model: Option<String>,

    /// Embedding model (overrides DOCQA_EMBEDDING_MODEL)
    #[arg(long)]
    pub embedding_model: Option<String>,

    /// Ollama server URL (overrides OLLAMA_BASE_URL)
    #[arg(long)]
    pub ollama_url: Option<String>,

    /// Number of segments retrieved per question
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
    pub top_k: u16,
}

impl Args {
    /// Environment configuration with command-line overrides applied
    pub fn ollama_config(&self) -> Result<OllamaConfig> {
        self.apply_overrides(OllamaConfig::from_env()?)
    }

    fn apply_overrides(&self, mut config: OllamaConfig) -> Result<OllamaConfig> {
        if let Some(ref url) = self.ollama_url {
            config = config.with_base_url(url.clone())?;
        }
        if let Some(ref model) = self.model {
            config = config.with_model(model.clone());
        }
        if let Some(ref model) = self.embedding_model {
            config = config.with_embedding_model(model.clone());
        }
        Ok(config)
    }

    /// Pipeline options for the given prompt style
    pub fn pipeline_options(&self, style: PromptStyle) -> PipelineOptions {
        PipelineOptions {
            top_k: usize::from(self.top_k),
            style,
            ..Default::default()
        }
    }
}
