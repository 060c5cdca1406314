//! Configuration for the embedding client

use crate::error::{EmbedError, Result};
use derive_builder::Builder;
use std::time::Duration;

/// Default OpenAI-compatible endpoint (OpenRouter).
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default embedding model name.
pub const DEFAULT_EMBEDDING_MODEL: &str = "openai/text-embedding-3-small";

/// Configuration for an OpenAI-compatible embedding endpoint
#[derive(Clone, Builder)]
#[builder(setter(into))]
pub struct EmbedConfig {
    /// Name of the embedding model to request
    #[builder(default = r#"DEFAULT_EMBEDDING_MODEL.to_string()"#)]
    pub model_name: String,
    /// Base URL of the API, without the `/embeddings` path
    #[builder(default = r#"DEFAULT_BASE_URL.to_string()"#)]
    pub base_url: String,
    /// Bearer token sent with every request
    pub api_key: String,
    /// Maximum number of texts sent in one request
    #[builder(default = "64")]
    pub batch_size: usize,
    /// Per-request timeout
    #[builder(default = "Duration::from_secs(30)")]
    pub timeout: Duration,
    /// Automatic retries for transient failures, on top of the first attempt
    #[builder(default = "2")]
    pub max_retries: usize,
    /// Requested output dimension, for models that support shortening
    #[builder(default)]
    pub dimensions: Option<usize>,
}

impl std::fmt::Debug for EmbedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedConfig")
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("batch_size", &self.batch_size)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

impl EmbedConfig {
    /// Create a new embedding configuration using the builder
    pub fn builder() -> EmbedConfigBuilder {
        EmbedConfigBuilder::default()
    }

    /// Configuration for an OpenRouter model with default batching and retries
    pub fn openrouter(api_key: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            batch_size: 64,
            timeout: Duration::from_secs(30),
            max_retries: 2,
            dimensions: None,
        }
    }

    /// Set the batch size (builder style)
    pub fn with_batch_size(self, batch_size: usize) -> Self {
        Self { batch_size, ..self }
    }

    /// Set the base URL (builder style)
    pub fn with_base_url<S: Into<String>>(self, base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            ..self
        }
    }

    /// Full URL of the embeddings endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url.trim_end_matches('/'))
    }

    /// Check the settings that would otherwise only fail on the first request
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(EmbedError::invalid_config("missing API key"));
        }
        if self.model_name.trim().is_empty() {
            return Err(EmbedError::invalid_config("missing embedding model name"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(EmbedError::invalid_config(format!(
                "base URL must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.batch_size == 0 {
            return Err(EmbedError::invalid_config("batch size must be positive"));
        }

        tracing::debug!("Embedding configuration valid for: {}", self.model_name);
        Ok(())
    }
}
