//! folio-retriever: corpus indexing and similarity search over a play collection
//!
//! The corpus is split with `folio-context`, embedded with `folio-embed` and
//! stored in a vector database. At startup the indexer only uploads the
//! corpus when the target collection does not exist yet.
//!
//! ## Key Modules
//!
//! - **[`retrieval`]**: corpus loader, indexer and the similarity search seam
//! - **[`storage`]**: vector store trait with Qdrant and in-memory backends
//! - **[`error`]**: [`IndexError`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use folio_embed::{EmbedConfig, OpenAiEmbeddingProvider};
//! use folio_retriever::retrieval::{index::{SimilarityIndex, VectorIndex}, indexer::CorpusIndexer};
//! use folio_retriever::storage::qdrant_store::QdrantStore;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let embedder = Arc::new(OpenAiEmbeddingProvider::new(
//!     EmbedConfig::builder().api_key("sk-or-...").build()?,
//! )?);
//! let store = Arc::new(QdrantStore::new(
//!     "http://localhost:6333",
//!     "shakespeare_collection",
//!     None,
//!     Duration::from_secs(30),
//! )?);
//!
//! CorpusIndexer::new(store.clone(), embedder.clone(), "data/folger-shakespeares")
//!     .ensure_collection(false)
//!     .await?;
//!
//! let index = VectorIndex::new(embedder, store);
//! for hit in index.similarity_search("Who killed Duncan?", 5).await? {
//!     println!("{:.3} {}", hit.score, hit.chunk.source_label);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Corpus → TextSplitter → EmbeddingProvider → VectorStore (Qdrant)
//!                                                  ↓
//!                          query → VectorIndex → ScoredChunk[]
//! ```

pub mod error;
pub mod retrieval;
pub mod storage;

pub use error::{IndexError, Result};

/// Collection used when none is configured.
pub const DEFAULT_COLLECTION_NAME: &str = "shakespeare_collection";
