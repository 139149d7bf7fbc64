//! Embedding indexer

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use docqa_core::{
    Document, DocumentIndexer, Embedder, IndexingResult, Result, SegmentOrigin, VectorDocument,
    VectorStore,
};

/// Embeds each segment once and stores it in a vector store
pub struct EmbeddingIndexer<E: Embedder, V: VectorStore> {
    embedder: Arc<E>,
    vector_store: Arc<V>,
}

impl<E: Embedder, V: VectorStore> EmbeddingIndexer<E, V> {
    /// Create a new embedding indexer
    pub fn new(embedder: Arc<E>, vector_store: Arc<V>) -> Self {
        Self {
            embedder,
            vector_store,
        }
    }

    /// Stable id prefix derived from the document's source path
    fn document_key(document: &Document) -> String {
        format!("{:x}", md5::compute(document.source.to_string_lossy().as_bytes()))
    }
}

fn origin_name(origin: SegmentOrigin) -> &'static str {
    match origin {
        SegmentOrigin::Page => "page",
        SegmentOrigin::Combined => "combined",
        SegmentOrigin::Placeholder => "placeholder",
    }
}

#[async_trait]
impl<E: Embedder + 'static, V: VectorStore + 'static> DocumentIndexer for EmbeddingIndexer<E, V> {
    async fn index_document(&self, document: &Document) -> Result<IndexingResult> {
        let key = Self::document_key(document);
        let total = document.segments.len();
        let mut documents_indexed = 0;
        let mut documents_failed = 0;
        let mut errors = Vec::new();

        for (i, segment) in document.segments.iter().enumerate() {
            tracing::debug!(segment = i + 1, total, "embedding segment");
            let embedding = self.embedder.embed(segment.text()).await?;

            let vector_doc = VectorDocument {
                id: format!("{}_{}", key, i),
                content: segment.text().to_string(),
                embedding,
                metadata: json!({
                    "source": document.source.display().to_string(),
                    "segment_index": i,
                    "total_segments": total,
                    "page": segment.page(),
                    "origin": origin_name(segment.origin()),
                }),
                score: None,
            };

            match self.vector_store.store(vector_doc).await {
                Ok(_) => documents_indexed += 1,
                Err(e) => {
                    documents_failed += 1;
                    errors.push(format!("Failed to store segment {}: {}", i, e));
                }
            }
        }

        tracing::info!(indexed = documents_indexed, failed = documents_failed, "indexing finished");

        Ok(IndexingResult {
            documents_indexed,
            documents_failed,
            errors,
        })
    }

    async fn stats(&self) -> Result<serde_json::Value> {
        let count = self.vector_store.count().await?;
        Ok(json!({
            "total_segments": count,
            "embedding_model": self.embedder.embedding_model(),
        }))
    }
}
