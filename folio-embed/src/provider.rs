//! Embedding provider implementations

use crate::config::EmbedConfig;
use crate::error::{EmbedError, Result};
use crate::retry::{RetryPolicy, error_body};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

/// Result of embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingResult {
    /// The generated embeddings, one per input text
    pub embeddings: Vec<Vec<f32>>,
    /// The dimension of each embedding vector
    pub dimension: usize,
}

impl EmbeddingResult {
    /// Create a new embedding result. The dimension is taken from the first
    /// vector, or 0 when there are none.
    pub fn new(embeddings: Vec<Vec<f32>>) -> Self {
        let dimension = embeddings.first().map(|e| e.len()).unwrap_or(0);
        Self {
            embeddings,
            dimension,
        }
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }
}

/// Trait for embedding providers that can generate embeddings from text
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for a single text
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let result = self.embed_texts(&[text.to_string()]).await?;
        result
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::invalid_response("no embedding returned for query"))
    }

    /// Generate embeddings for multiple texts (batch processing)
    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingResult>;

    /// Dimension of the produced vectors, if known before the first request
    fn embedding_dimension(&self) -> Option<usize>;

    /// Get the name/identifier of this provider
    fn provider_name(&self) -> &str;
}

/// Embedding provider for OpenAI-compatible `/embeddings` endpoints
/// (OpenAI, OpenRouter, and most self-hosted gateways).
#[derive(Clone)]
pub struct OpenAiEmbeddingProvider {
    client: reqwest::Client,
    config: EmbedConfig,
    endpoint: String,
    retry: RetryPolicy,
}

impl std::fmt::Debug for OpenAiEmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbeddingProvider")
            .field("config", &self.config)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl OpenAiEmbeddingProvider {
    /// Validates the configuration and builds the HTTP client.
    pub fn new(config: EmbedConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", config.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| EmbedError::invalid_config("API key is not a valid header value"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        tracing::info!(
            "Embedding provider ready: model={}, endpoint={}",
            config.model_name,
            config.endpoint()
        );

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            retry: RetryPolicy::new(config.max_retries),
            config,
        })
    }

    /// Replaces the retry policy derived from `max_retries`.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.config.model_name,
            input: inputs,
            dimensions: self.config.dimensions,
        };

        let resp = self
            .retry
            .send("Embedding request", || self.client.post(&self.endpoint).json(&request))
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(EmbedError::Api {
                status: status.as_u16(),
                body: error_body(resp).await,
            });
        }
        let parsed: EmbeddingResponse = resp.json().await?;
        parsed.into_embeddings(inputs.len())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingResult> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.config.batch_size) {
            tracing::debug!("Embedding batch of {} texts", batch.len());
            embeddings.extend(self.embed_batch(batch).await?);
        }
        Ok(EmbeddingResult::new(embeddings))
    }

    fn embedding_dimension(&self) -> Option<usize> {
        self.config.dimensions
    }

    fn provider_name(&self) -> &str {
        &self.config.model_name
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

impl EmbeddingResponse {
    fn into_embeddings(mut self, expected_len: usize) -> Result<Vec<Vec<f32>>> {
        if self.data.len() != expected_len {
            return Err(EmbedError::invalid_response(format!(
                "endpoint returned {} embeddings for {} inputs",
                self.data.len(),
                expected_len
            )));
        }
        self.data.sort_by_key(|entry| entry.index);
        Ok(self.data.into_iter().map(|entry| entry.embedding).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_is_reordered_by_index() {
        let body = r#"{
            "object": "list",
            "data": [
                {"object": "embedding", "index": 1, "embedding": [0.0, 1.0]},
                {"object": "embedding", "index": 0, "embedding": [1.0, 0.0]}
            ],
            "model": "openai/text-embedding-3-small"
        }"#;
        let parsed: EmbeddingResponse = serde_json::from_str(body).unwrap();
        let embeddings = parsed.into_embeddings(2).unwrap();
        assert_eq!(embeddings, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_response_count_mismatch_is_an_error() {
        let body = r#"{"data": [{"index": 0, "embedding": [1.0]}]}"#;
        let parsed: EmbeddingResponse = serde_json::from_str(body).unwrap();
        let err = parsed.into_embeddings(3).unwrap_err();
        assert!(err.to_string().contains("1 embeddings for 3 inputs"));
    }

    #[test]
    fn test_request_omits_missing_dimensions() {
        let inputs = vec!["to be".to_string()];
        let request = EmbeddingRequest {
            model: "m",
            input: &inputs,
            dimensions: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"model": "m", "input": ["to be"]}));
    }

    #[test]
    fn test_embedding_result() {
        let result = EmbeddingResult::new(vec![vec![0.1, 0.2, 0.3]]);
        assert_eq!(result.len(), 1);
        assert_eq!(result.dimension, 3);
        assert!(!result.is_empty());
        assert!(EmbeddingResult::new(Vec::new()).is_empty());
    }

    #[test]
    fn test_provider_rejects_invalid_config() {
        let err = OpenAiEmbeddingProvider::new(EmbedConfig::openrouter("", "model")).unwrap_err();
        assert!(matches!(err, EmbedError::InvalidConfig { .. }));
    }

    struct FixedProvider;

    #[async_trait]
    impl EmbeddingProvider for FixedProvider {
        async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingResult> {
            Ok(EmbeddingResult::new(
                texts.iter().map(|t| vec![t.len() as f32]).collect(),
            ))
        }

        fn embedding_dimension(&self) -> Option<usize> {
            Some(1)
        }

        fn provider_name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_default_embed_text_uses_batch_call() {
        let embedding = tokio_test::block_on(FixedProvider.embed_text("wherefore")).unwrap();
        assert_eq!(embedding, vec![9.0]);
    }
}
