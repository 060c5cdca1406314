use crate::error::Result;
use crate::storage::{ScoredChunk, VectorStore};
use async_trait::async_trait;
use folio_embed::EmbeddingProvider;
use std::sync::Arc;

/// Text-in, chunks-out similarity search.
///
/// Results are ordered best match first; callers rely on that order.
#[async_trait]
pub trait SimilarityIndex: Send + Sync {
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>>;
}

/// [`SimilarityIndex`] that embeds the query and searches a [`VectorStore`].
#[derive(Clone)]
pub struct VectorIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

impl VectorIndex {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }
}

#[async_trait]
impl SimilarityIndex for VectorIndex {
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let vector = self.embedder.embed_text(query).await?;
        let hits = self.store.search(vector, k).await?;
        tracing::debug!(
            "Similarity search in '{}' returned {} hits",
            self.store.collection_name(),
            hits.len()
        );
        Ok(hits)
    }
}
