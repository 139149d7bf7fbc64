//! Ollama integration for docqa
//!
//! This crate provides the Ollama implementation of the LLMProvider and Embedder traits.

mod client;
mod config;


pub use client::OllamaClient;
pub use config::{OllamaConfig, DEFAULT_BASE_URL};

// Re-export core types for convenience
pub use docqa_core::{
    Embedder, LLMProvider, GenerationConfig, GenerationResult, Error, Result,
};
