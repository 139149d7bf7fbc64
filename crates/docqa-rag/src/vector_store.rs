//! In-memory vector store

use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};

use docqa_core::{
    VectorStore, VectorDocument, SearchResult, SearchConfig,
    Error, Result,
};

/// Exact cosine-similarity search over documents held in memory.
///
/// Insertion order is kept, so equal scores come back in the order stored.
pub struct InMemoryVectorStore {
    documents: Arc<RwLock<Vec<VectorDocument>>>,
    connected: bool,
}

impl InMemoryVectorStore {
    /// Create a new in-memory vector store
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(Vec::new())),
            connected: false,
        }
    }

    /// Simple cosine similarity calculation
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }

    fn check_dimensions(existing: &[VectorDocument], document: &VectorDocument) -> Result<()> {
        if document.embedding.is_empty() {
            return Err(Error::VectorStore(format!(
                "Document {} has an empty embedding",
                document.id
            )));
        }

        if let Some(first) = existing.iter().find(|doc| doc.id != document.id) {
            if first.embedding.len() != document.embedding.len() {
                return Err(Error::VectorStore(format!(
                    "Embedding dimension mismatch for {}: expected {}, got {}",
                    document.id,
                    first.embedding.len(),
                    document.embedding.len()
                )));
            }
        }

        Ok(())
    }

    fn insert(docs: &mut Vec<VectorDocument>, document: VectorDocument) -> Result<String> {
        Self::check_dimensions(docs, &document)?;
        let id = document.id.clone();

        match docs.iter_mut().find(|doc| doc.id == id) {
            Some(existing) => *existing = document,
            None => docs.push(document),
        }

        Ok(id)
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn connect(&mut self) -> Result<()> {
        self.connected = true;
        Ok(())
    }

    async fn store(&self, document: VectorDocument) -> Result<String> {
        let mut docs = self.documents.write()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;
        Self::insert(&mut docs, document)
    }

    async fn store_batch(&self, documents: Vec<VectorDocument>) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut docs = self.documents.write()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;

        for document in documents {
            ids.push(Self::insert(&mut docs, document)?);
        }

        Ok(ids)
    }

    async fn search_by_vector(&self, vector: &[f32], config: &SearchConfig) -> Result<SearchResult> {
        let docs = self.documents.read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;

        let mut results: Vec<VectorDocument> = docs
            .iter()
            .map(|doc| {
                let score = Self::cosine_similarity(vector, &doc.embedding);
                let mut doc_with_score = doc.clone();
                doc_with_score.score = Some(score);
                doc_with_score
            })
            .filter(|doc| {
                if let Some(threshold) = config.score_threshold {
                    doc.score.unwrap_or(0.0) >= threshold
                } else {
                    true
                }
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .unwrap_or(0.0)
                .partial_cmp(&a.score.unwrap_or(0.0))
                .unwrap_or(Ordering::Equal)
        });

        results.truncate(config.top_k);

        let total = results.len();

        Ok(SearchResult {
            documents: results,
            total,
        })
    }

    async fn get(&self, id: &str) -> Result<Option<VectorDocument>> {
        let docs = self.documents.read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;
        Ok(docs.iter().find(|doc| doc.id == id).cloned())
    }

    async fn clear(&self) -> Result<()> {
        let mut docs = self.documents.write()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;
        docs.clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let docs = self.documents.read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;
        Ok(docs.len())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
