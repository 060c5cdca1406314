//! # folio-rag
//!
//! Retrieval-augmented question answering over the plays indexed by
//! `folio-retriever`. A query is validated, the closest passages are fetched
//! from the vector index, and a hosted chat model answers from them.
//!
//! ## Architecture
//!
//! ```text
//! query → validate → SimilarityIndex (top 5) → context (top 3) → prompt → ChatCompletion → answer
//! ```
//!
//! Failures inside a query never escape [`pipeline::Orchestrator::answer`]:
//! they are turned into the text returned to the caller. Only startup
//! (configuration, corpus, index reachability) can fail hard.
//!
//! ## Usage
//!
//! ```no_run
//! use folio_embed::{EmbedConfig, OpenAiEmbeddingProvider};
//! use folio_rag::llm::openai::{ChatConfig, OpenAiChatClient};
//! use folio_rag::pipeline::Orchestrator;
//! use folio_rag::RagConfig;
//! use folio_retriever::retrieval::index::VectorIndex;
//! use folio_retriever::storage::qdrant_store::QdrantStore;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = RagConfig::from_env()?;
//! let embedder = Arc::new(OpenAiEmbeddingProvider::new(
//!     EmbedConfig::builder()
//!         .api_key(config.openrouter_api_key.clone())
//!         .model_name(config.embedding_model.clone())
//!         .build()?,
//! )?);
//! let store = Arc::new(QdrantStore::new(
//!     &config.qdrant_url,
//!     &config.qdrant_collection_name,
//!     None,
//!     Duration::from_secs(30),
//! )?);
//! let chat = OpenAiChatClient::new(ChatConfig::new(
//!     config.openrouter_api_key.clone(),
//!     config.model_name.clone(),
//! ))?;
//!
//! let orchestrator = Orchestrator::new(Arc::new(VectorIndex::new(embedder, store)), Arc::new(chat));
//! println!("{}", orchestrator.answer("Why does Hamlet hesitate?").await);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod repl;

pub use config::RagConfig;
pub use error::{ConfigError, GenerationError};
pub use pipeline::{Orchestrator, PipelineState, RawQuery};
