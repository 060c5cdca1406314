//! # folio-embed
//!
//! Async client for OpenAI-compatible embedding endpoints such as OpenRouter.
//! Texts are sent in batches, transient failures are retried with exponential
//! backoff, and results come back in input order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use folio_embed::{EmbedConfig, EmbeddingProvider, OpenAiEmbeddingProvider};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = EmbedConfig::builder()
//!     .api_key(std::env::var("OPENROUTER_API_KEY")?)
//!     .model_name("openai/text-embedding-3-small")
//!     .build()?;
//! let provider = OpenAiEmbeddingProvider::new(config)?;
//!
//! let texts = vec!["To be, or not to be".to_string(), "Out, damned spot!".to_string()];
//! let result = provider.embed_texts(&texts).await?;
//!
//! println!("Generated {} embeddings of dimension {}", result.len(), result.dimension);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: endpoint, model and batching settings
//! - [`provider`]: the [`EmbeddingProvider`] trait and the HTTP implementation
//! - [`retry`]: retry and backoff policy shared with other HTTP clients
//! - [`error`]: error types and result handling

pub mod config;
pub mod error;
pub mod provider;
pub mod retry;

pub use config::{DEFAULT_BASE_URL, DEFAULT_EMBEDDING_MODEL, EmbedConfig, EmbedConfigBuilder};
pub use error::{EmbedError, Result};
pub use provider::{EmbeddingProvider, EmbeddingResult, OpenAiEmbeddingProvider};
pub use retry::RetryPolicy;
