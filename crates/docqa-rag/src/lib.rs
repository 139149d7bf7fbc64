//! Retrieval-augmented question answering over a single PDF
//!
//! This crate provides the PDF loader, the fallback extraction policy, an
//! in-memory vector store, the embedding indexer, the RAG engine, the answer
//! composer and the pipeline that wires them together.

mod loader;
mod fallback;
mod vector_store;
mod indexer;
mod engine;
mod composer;
mod pipeline;

#[cfg(test)]
mod test_support;


pub use loader::{chunk_text, normalize_text, validate_pdf_path, PdfLoader};
pub use fallback::{
    load_document, placeholder_segment, recover_segments, resolve_segments, FallbackExtractor,
    MIN_COMBINED_CHARS, MIN_MEANINGFUL_PAGES, MIN_PAGE_CHARS,
};
pub use vector_store::InMemoryVectorStore;
pub use indexer::EmbeddingIndexer;
pub use engine::{DocumentRAGEngine, CONTEXT_SEPARATOR};
pub use composer::{prepare_question, render_prompt, AnswerComposer, PromptFields, PromptStyle};
pub use pipeline::{Answer, PipelineOptions, QaPipeline};

// Re-export core types for convenience
pub use docqa_core::{
    RAGEngine, RAGQuery, RAGResult,
    VectorStore, VectorDocument, SearchResult, SearchConfig,
    DocumentIndexer, IndexingResult, ChunkingConfig,
    Document, DocumentLoader, ExtractionOutcome, Segment, SegmentOrigin,
    Error, Result,
};
