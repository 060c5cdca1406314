//! Storage abstraction layer for folio-retriever
//!
//! A [`VectorStore`] is bound to a single named collection and offers the
//! handful of operations the indexer and the search path need: existence
//! check, creation, bulk upsert of embedded chunks and nearest-neighbour
//! search.
//!
//! ## Implementations
//!
//! - [`qdrant_store::QdrantStore`]: Qdrant REST API
//! - [`memory_store::MemoryStore`]: brute-force cosine search held in memory,
//!   for tests and offline experiments
//!
//! Payloads written by [`qdrant_store::QdrantStore`] use the
//! `page_content` / `metadata` layout, so collections created by other
//! tooling with that layout can be searched as well.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod memory_store;
pub mod qdrant_store;

/// Point identifier inside a collection.
pub type PointId = u64;

/// Text excerpt of a corpus document, as stored in and returned by the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    /// Work title the excerpt was taken from
    pub source_label: String,
    /// Position of the excerpt within its document
    pub sequence_index: usize,
    /// Path of the document on the indexing machine, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl Chunk {
    pub fn new(
        content: impl Into<String>,
        source_label: impl Into<String>,
        sequence_index: usize,
    ) -> Self {
        Self {
            content: content.into(),
            source_label: source_label.into(),
            sequence_index,
            file_path: None,
        }
    }
}

impl From<folio_context::TextChunk> for Chunk {
    fn from(chunk: folio_context::TextChunk) -> Self {
        Self {
            content: chunk.text,
            source_label: chunk.source,
            sequence_index: chunk.sequence,
            file_path: Some(chunk.file_path),
        }
    }
}

/// A chunk together with its vector, ready to be written.
#[derive(Debug, Clone)]
pub struct EmbeddedChunk {
    pub id: PointId,
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}

/// Search hit. Higher scores mean closer matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Summary of a collection, as shown by the `status` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionInfo {
    pub name: String,
    pub status: String,
    pub points_count: Option<u64>,
    pub dimension: Option<usize>,
}

/// Vector similarity storage for one named collection.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Name of the collection this store reads and writes
    fn collection_name(&self) -> &str;

    /// Location shown in logs and error messages
    fn location(&self) -> String;

    /// Whether the collection exists. Errors mean the backend could not answer.
    async fn collection_exists(&self) -> Result<bool>;

    /// Create the collection for vectors of the given dimension (cosine distance)
    async fn create_collection(&self, dimension: usize) -> Result<()>;

    /// Drop the collection and everything in it
    async fn delete_collection(&self) -> Result<()>;

    /// Insert or replace points, returning how many were written
    async fn upsert(&self, points: Vec<EmbeddedChunk>) -> Result<usize>;

    /// Nearest neighbours of `vector`, best match first
    async fn search(&self, vector: Vec<f32>, limit: usize) -> Result<Vec<ScoredChunk>>;

    /// Collection summary, or `None` when it does not exist
    async fn collection_info(&self) -> Result<Option<CollectionInfo>>;
}
