//! Error types for corpus indexing and similarity search

use folio_embed::EmbedError;
use std::path::PathBuf;

/// Result type for indexing and search operations.
pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The corpus directory holds no usable text files
    #[error("No corpus documents found in {}", dir.display())]
    EmptyCorpus { dir: PathBuf },

    #[error("Failed to read corpus path {}: {source}", path.display())]
    CorpusRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The vector index could not be reached, or answered with an error,
    /// while checking whether the collection exists
    #[error("Vector index at {url} is unreachable: {message}")]
    Unreachable { url: String, message: String },

    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbedError),

    #[error("Vector store error: {source}")]
    Store {
        #[from]
        source: anyhow::Error,
    },
}

impl IndexError {
    pub fn unreachable<U: Into<String>>(url: U, cause: &anyhow::Error) -> Self {
        Self::Unreachable {
            url: url.into(),
            message: format!("{cause:#}"),
        }
    }
}
