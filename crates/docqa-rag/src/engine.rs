//! RAG engine implementation

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use docqa_core::{
    Embedder, Error, RAGEngine, RAGQuery, RAGResult, Result, SearchConfig, VectorDocument,
    VectorStore,
};

/// Separator placed between retrieved segments in the context
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Retrieves the segments of a single indexed document
pub struct DocumentRAGEngine<E: Embedder, V: VectorStore> {
    embedder: Arc<E>,
    vector_store: Arc<V>,
    initialized: bool,
}

impl<E: Embedder, V: VectorStore> DocumentRAGEngine<E, V> {
    /// Create a new engine over an already populated vector store
    pub fn new(embedder: Arc<E>, vector_store: Arc<V>) -> Self {
        Self {
            embedder,
            vector_store,
            initialized: false,
        }
    }
}

#[async_trait]
impl<E: Embedder + 'static, V: VectorStore + 'static> RAGEngine for DocumentRAGEngine<E, V> {
    async fn initialize(&mut self) -> Result<()> {
        if !self.vector_store.is_connected() {
            return Err(Error::RAGEngine("Vector store not connected".to_string()));
        }

        if self.vector_store.count().await? == 0 {
            return Err(Error::RAGEngine("Vector store is empty".to_string()));
        }

        self.initialized = true;
        Ok(())
    }

    async fn retrieve(&self, query: &RAGQuery) -> Result<RAGResult> {
        if !self.initialized {
            return Err(Error::RAGEngine("RAG engine not initialized".to_string()));
        }

        let query_embedding = self.embedder.embed(&query.query).await?;

        let search_config = SearchConfig {
            top_k: query.top_k,
            score_threshold: query.score_threshold,
        };

        let search_result = self
            .vector_store
            .search_by_vector(&query_embedding, &search_config)
            .await?;
        let context = self.build_context(&search_result.documents);

        tracing::debug!(results = search_result.total, "retrieved segments");

        Ok(RAGResult {
            documents: search_result.documents,
            context,
            metadata: Some(json!({
                "query": query.query,
                "top_k": query.top_k,
                "results_count": search_result.total,
            })),
        })
    }

    fn build_context(&self, documents: &[VectorDocument]) -> String {
        documents
            .iter()
            .map(|doc| doc.content.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR)
    }

    async fn stats(&self) -> Result<serde_json::Value> {
        let vector_count = self.vector_store.count().await?;

        Ok(json!({
            "initialized": self.initialized,
            "vector_store_count": vector_count,
            "embedding_model": self.embedder.embedding_model(),
        }))
    }

    fn is_ready(&self) -> bool {
        self.initialized && self.vector_store.is_connected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::HashingEmbedder;
    use crate::InMemoryVectorStore;

    async fn store_with(texts: &[&str]) -> Arc<InMemoryVectorStore> {
        let mut store = InMemoryVectorStore::new();
        store.connect().await.unwrap();
        for (i, text) in texts.iter().enumerate() {
            let embedding = HashingEmbedder.embed(text).await.unwrap();
            store
                .store(VectorDocument {
                    id: format!("seg_{}", i),
                    content: text.to_string(),
                    embedding,
                    metadata: json!({}),
                    score: None,
                })
                .await
                .unwrap();
        }
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_rag_engine() {
        let store = store_with(&[
            "Glucose is a simple sugar used for energy",
            "Phospholipids form cell membranes",
        ])
        .await;
        let mut engine = DocumentRAGEngine::new(Arc::new(HashingEmbedder), store);

        engine.initialize().await.unwrap();
        assert!(engine.is_ready());

        let query = RAGQuery {
            query: "What forms cell membranes?".to_string(),
            top_k: 1,
            score_threshold: None,
        };

        let result = engine.retrieve(&query).await.unwrap();
        assert_eq!(result.documents.len(), 1);
        assert_eq!(result.context, "Phospholipids form cell membranes");
    }

    #[tokio::test]
    async fn test_retrieve_before_initialize_fails() {
        let store = store_with(&["Starch is a polysaccharide"]).await;
        let engine = DocumentRAGEngine::new(Arc::new(HashingEmbedder), store);

        let err = engine.retrieve(&RAGQuery::new("starch")).await.unwrap_err();
        assert!(matches!(err, Error::RAGEngine(_)));
    }

    #[tokio::test]
    async fn test_initialize_rejects_empty_store() {
        let store = store_with(&[]).await;
        let mut engine = DocumentRAGEngine::new(Arc::new(HashingEmbedder), store);
        assert!(engine.initialize().await.is_err());
        assert!(!engine.is_ready());
    }

    #[tokio::test]
    async fn test_initialize_rejects_disconnected_store() {
        let mut engine = DocumentRAGEngine::new(
            Arc::new(HashingEmbedder),
            Arc::new(InMemoryVectorStore::new()),
        );
        assert!(engine.initialize().await.is_err());
    }

    #[tokio::test]
    async fn test_build_context_joins_in_rank_order() {
        let store = store_with(&["unused"]).await;
        let engine = DocumentRAGEngine::new(Arc::new(HashingEmbedder), store);

        let docs = vec![
            VectorDocument {
                id: "1".to_string(),
                content: "First ranked".to_string(),
                embedding: vec![1.0],
                metadata: json!({}),
                score: Some(0.9),
            },
            VectorDocument {
                id: "2".to_string(),
                content: "Second ranked".to_string(),
                embedding: vec![1.0],
                metadata: json!({}),
                score: Some(0.4),
            },
        ];

        assert_eq!(engine.build_context(&docs), "First ranked\n\nSecond ranked");
        assert_eq!(engine.build_context(&[]), "");
    }
}
