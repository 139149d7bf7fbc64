//! Core traits and types for docqa
//!
//! This crate defines the fundamental traits and types used across the docqa system.
//! It provides capability-facing interfaces for LLM providers, embedders, document
//! loaders, vector stores, indexers and RAG engines, so every stage of the
//! question-answering pipeline can be swapped out in tests.

pub mod llm;
pub mod embedding;
pub mod document;
pub mod rag;
pub mod vector_store;
pub mod document_indexer;
pub mod error;


pub use error::{Error, Result};
pub use llm::{LLMProvider, GenerationConfig, GenerationResult, DEFAULT_MODEL};
pub use embedding::{Embedder, DEFAULT_EMBEDDING_MODEL};
pub use document::{Document, DocumentLoader, ExtractionOutcome, Segment, SegmentOrigin};
pub use rag::{RAGEngine, RAGQuery, RAGResult};
pub use vector_store::{VectorStore, VectorDocument, SearchResult, SearchConfig};
pub use document_indexer::{DocumentIndexer, IndexingResult, ChunkingConfig};
