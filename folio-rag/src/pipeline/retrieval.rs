//! Retrieval step: similarity search plus context formatting

use folio_retriever::IndexError;
use folio_retriever::retrieval::index::SimilarityIndex;
use folio_retriever::storage::Chunk;
use std::sync::Arc;

/// Neighbours requested from the index per query.
pub const TOP_K: usize = 5;

/// Leading chunks that make it into the prompt.
pub const CONTEXT_CHUNKS: usize = 3;

/// Characters of each chunk quoted in the prompt.
pub const CONTENT_PREVIEW_CHARS: usize = 500;

/// Context used when the search succeeded but found nothing.
pub const NO_RESULTS_CONTEXT: &str = "No relevant text found.";

/// Result of the retrieval step.
#[derive(Debug)]
pub enum RetrievalOutcome {
    /// At least one chunk, best match first
    Found(Vec<Chunk>),
    /// The index answered with no results
    Empty,
    /// The index could not be searched
    Failed(IndexError),
}

impl RetrievalOutcome {
    /// Splits the outcome into the chunks and the context text handed to generation.
    pub fn into_parts(self) -> (Vec<Chunk>, String) {
        match self {
            RetrievalOutcome::Found(chunks) => {
                let context = format_context(&chunks);
                (chunks, context)
            }
            RetrievalOutcome::Empty => (Vec::new(), NO_RESULTS_CONTEXT.to_string()),
            RetrievalOutcome::Failed(err) => {
                (Vec::new(), format!("Error retrieving context: {err}"))
            }
        }
    }
}

/// Formats the leading chunks as `Source:` / `Content:` / `---` blocks.
///
/// Content is cut after [`CONTENT_PREVIEW_CHARS`] characters and always gets
/// a trailing `...`.
pub fn format_context(chunks: &[Chunk]) -> String {
    let mut lines = Vec::with_capacity(CONTEXT_CHUNKS * 3);
    for chunk in chunks.iter().take(CONTEXT_CHUNKS) {
        let preview: String = chunk.content.chars().take(CONTENT_PREVIEW_CHARS).collect();
        lines.push(format!("Source: {}", chunk.source_label));
        lines.push(format!("Content: {preview}..."));
        lines.push("---".to_string());
    }
    lines.join("\n")
}

#[derive(Clone)]
pub struct RetrievalStep {
    index: Arc<dyn SimilarityIndex>,
    k: usize,
}

impl RetrievalStep {
    pub fn new(index: Arc<dyn SimilarityIndex>) -> Self {
        Self { index, k: TOP_K }
    }

    /// Searches the index. Never fails; errors become [`RetrievalOutcome::Failed`].
    pub async fn retrieve(&self, query: &str) -> RetrievalOutcome {
        tracing::info!("Searching for passages related to: '{}'", query);
        match self.index.similarity_search(query, self.k).await {
            Ok(hits) if hits.is_empty() => {
                tracing::warn!("No passages retrieved");
                RetrievalOutcome::Empty
            }
            Ok(hits) => {
                tracing::info!("Retrieved {} passages", hits.len());
                for (rank, hit) in hits.iter().enumerate() {
                    tracing::debug!(
                        "#{} {} chunk {} score {:.4} ({} chars)",
                        rank + 1,
                        hit.chunk.source_label,
                        hit.chunk.sequence_index,
                        hit.score,
                        hit.chunk.content.chars().count()
                    );
                }
                RetrievalOutcome::Found(hits.into_iter().map(|hit| hit.chunk).collect())
            }
            Err(err) => {
                tracing::error!("Retrieval failed: {}", err);
                RetrievalOutcome::Failed(err)
            }
        }
    }
}
