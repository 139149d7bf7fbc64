//! Question-answering pipeline over one PDF

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use docqa_core::{
    Document, DocumentIndexer, DocumentLoader, Embedder, Error, LLMProvider,
    RAGEngine, RAGQuery, Result, VectorDocument, VectorStore,
};

use crate::composer::{prepare_question, AnswerComposer, PromptStyle};
use crate::engine::DocumentRAGEngine;
use crate::fallback::load_document;
use crate::indexer::EmbeddingIndexer;
use crate::loader::validate_pdf_path;

/// Settings for building a pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub top_k: usize,
    pub score_threshold: Option<f32>,
    pub style: PromptStyle,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            top_k: 4,
            score_threshold: None,
            style: PromptStyle::Grounded,
        }
    }
}

/// An answered question with the material that produced it
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub prompt: String,
    pub retrieved: Vec<VectorDocument>,
}

/// Loaded document, built index and model handle, ready for questions
pub struct QaPipeline<L: LLMProvider, E: Embedder, V: VectorStore> {
    document: Document,
    engine: DocumentRAGEngine<E, V>,
    composer: AnswerComposer<L>,
    options: PipelineOptions,
}

impl<L, E, V> QaPipeline<L, E, V>
where
    L: LLMProvider,
    E: Embedder + 'static,
    V: VectorStore + 'static,
{
    /// Load, embed and index the PDF at `path`.
    ///
    /// The path is checked before any extraction; a missing file is an
    /// `InvalidInput` error. The client handles must already be connected.
    pub async fn build<D: DocumentLoader>(
        path: &Path,
        loader: &D,
        llm: L,
        embedder: Arc<E>,
        vector_store: Arc<V>,
        options: PipelineOptions,
    ) -> Result<Self> {
        validate_pdf_path(path)?;

        tracing::info!(path = %path.display(), "processing PDF");
        let document = load_document(loader, path)?;

        tracing::info!("creating embeddings store");
        let indexer = EmbeddingIndexer::new(embedder.clone(), vector_store.clone());
        let result = indexer.index_document(&document).await?;
        if result.documents_indexed == 0 {
            return Err(Error::RAGEngine(format!(
                "No segments could be indexed: {}",
                result.errors.join("; ")
            )));
        }

        let mut engine = DocumentRAGEngine::new(embedder, vector_store);
        engine.initialize().await?;

        Ok(Self {
            document,
            engine,
            composer: AnswerComposer::new(llm, options.style),
            options,
        })
    }

    /// Answer one question. Blank questions fail before retrieval or any model call.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let question = prepare_question(question)?;

        let query = RAGQuery {
            query: question.to_string(),
            top_k: self.options.top_k,
            score_threshold: self.options.score_threshold,
        };
        let retrieved = self.engine.retrieve(&query).await?;
        let prompt = self.composer.compose_prompt(question, &retrieved);

        tracing::info!("asking the model");
        let text = self.composer.answer(&prompt).await?;

        Ok(Answer {
            text,
            prompt,
            retrieved: retrieved.documents,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn engine(&self) -> &DocumentRAGEngine<E, V> {
        &self.engine
    }

    /// Release the model handle
    pub async fn shutdown(mut self) -> Result<()> {
        self.composer.llm_mut().shutdown().await
    }
}
