//! Startup indexing policy
//!
//! [`CorpusIndexer::ensure_collection`] decides between connecting to an
//! existing collection and building it from the corpus:
//!
//! - collection listed by the store: connect, nothing is re-submitted
//! - collection not listed: load, split, embed and upload the whole corpus
//! - store cannot answer the existence check: [`IndexError::Unreachable`]
//!
//! With `force` an existing collection is dropped and rebuilt. An ingest that
//! fails after the collection was created drops it again, so the next start
//! indexes from scratch instead of connecting to a partial collection.

use crate::error::{IndexError, Result};
use crate::retrieval::corpus::Corpus;
use crate::storage::{Chunk, EmbeddedChunk, VectorStore};
use folio_context::TextSplitter;
use folio_embed::EmbeddingProvider;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Number of chunks embedded and uploaded per round trip.
pub const DEFAULT_INGEST_BATCH_SIZE: usize = 64;

/// What [`CorpusIndexer::ensure_collection`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexAction {
    /// The collection already existed and was left untouched
    Connected,
    /// The collection was created from the corpus
    Ingested { documents: usize, chunks: usize },
    /// An existing collection was dropped and created again
    Rebuilt { documents: usize, chunks: usize },
}

pub struct CorpusIndexer {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    splitter: TextSplitter,
    corpus_dir: PathBuf,
    batch_size: usize,
}

impl CorpusIndexer {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        corpus_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            embedder,
            splitter: TextSplitter::default(),
            corpus_dir: corpus_dir.into(),
            batch_size: DEFAULT_INGEST_BATCH_SIZE,
        }
    }

    pub fn with_splitter(mut self, splitter: TextSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn corpus_dir(&self) -> &Path {
        &self.corpus_dir
    }

    /// Connects to the collection, building it first if it does not exist.
    pub async fn ensure_collection(&self, force: bool) -> Result<IndexAction> {
        let name = self.store.collection_name().to_string();
        let exists = self
            .store
            .collection_exists()
            .await
            .map_err(|e| IndexError::unreachable(self.store.location(), &e))?;

        if exists && !force {
            tracing::info!("Collection '{}' exists, connecting without re-indexing", name);
            return Ok(IndexAction::Connected);
        }

        // Read the corpus before touching the store so a bad corpus leaves it unchanged
        let corpus = Corpus::load(&self.corpus_dir)?;

        if exists {
            tracing::warn!("Dropping collection '{}' for a forced rebuild", name);
            self.store.delete_collection().await?;
        } else {
            tracing::info!("Collection '{}' not found, indexing corpus", name);
        }

        let chunks = self.ingest(&corpus).await?;
        let documents = corpus.len();
        Ok(if exists {
            IndexAction::Rebuilt { documents, chunks }
        } else {
            IndexAction::Ingested { documents, chunks }
        })
    }

    /// Splits, embeds and uploads `corpus` into a new collection.
    /// Returns the number of chunks written.
    pub async fn ingest(&self, corpus: &Corpus) -> Result<usize> {
        let chunks: Vec<Chunk> = corpus
            .chunks(&self.splitter)
            .into_iter()
            .map(Chunk::from)
            .collect();
        if chunks.is_empty() {
            return Err(IndexError::EmptyCorpus {
                dir: corpus.dir().to_path_buf(),
            });
        }
        tracing::info!(
            "Split {} documents into {} chunks",
            corpus.len(),
            chunks.len()
        );

        let mut created = false;
        match self.upload(&chunks, &mut created).await {
            Ok(written) => Ok(written),
            Err(err) => {
                if created {
                    self.drop_partial_collection(&err).await;
                }
                Err(err)
            }
        }
    }

    /// Embeds and upserts `chunks` batch by batch, creating the collection
    /// once the first batch reveals the vector dimension.
    async fn upload(&self, chunks: &[Chunk], created: &mut bool) -> Result<usize> {
        let total = chunks.len();
        let mut written = 0usize;

        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let embeddings = self.embedder.embed_texts(&texts).await?;
            if embeddings.len() != batch.len() {
                return Err(IndexError::Store {
                    source: anyhow::anyhow!(
                        "embedder returned {} vectors for {} chunks",
                        embeddings.len(),
                        batch.len()
                    ),
                });
            }

            if !*created {
                self.store.create_collection(embeddings.dimension).await?;
                *created = true;
            }

            let points = batch
                .iter()
                .cloned()
                .zip(embeddings.embeddings)
                .enumerate()
                .map(|(offset, (chunk, vector))| EmbeddedChunk {
                    id: (written + offset) as u64,
                    chunk,
                    vector,
                })
                .collect();
            written += self.store.upsert(points).await?;
            tracing::info!("Indexed {}/{} chunks", written, total);
        }

        Ok(written)
    }

    /// A half-written collection would be reported as existing on the next
    /// start, so it is removed. The ingest error is what the caller sees.
    async fn drop_partial_collection(&self, cause: &IndexError) {
        let name = self.store.collection_name();
        tracing::warn!("Ingest failed ({}), dropping partial collection '{}'", cause, name);
        if let Err(e) = self.store.delete_collection().await {
            tracing::error!("Failed to drop partial collection '{}': {:#}", name, e);
        }
    }
}
