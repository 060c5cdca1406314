//! Qdrant REST backend
//!
//! Talks to the HTTP API directly with `reqwest`; every call goes through the
//! same retry policy as the embedding client.

use super::{Chunk, CollectionInfo, EmbeddedChunk, ScoredChunk, VectorStore};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use folio_embed::RetryPolicy;
use folio_embed::retry::error_body;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6333";

/// Vector store backed by one Qdrant collection.
#[derive(Clone)]
pub struct QdrantStore {
    client: reqwest::Client,
    base_url: String,
    collection: String,
    retry: RetryPolicy,
}

impl std::fmt::Debug for QdrantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantStore")
            .field("base_url", &self.base_url)
            .field("collection", &self.collection)
            .finish()
    }
}

impl QdrantStore {
    /// # Arguments
    /// * `base_url` - Qdrant HTTP address, e.g. `http://localhost:6333`
    /// * `collection` - Collection to read and write
    /// * `api_key` - Sent as the `api-key` header when set (Qdrant Cloud)
    pub fn new(
        base_url: impl Into<String>,
        collection: impl Into<String>,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let collection = collection.into();
        anyhow::ensure!(
            base_url.starts_with("http://") || base_url.starts_with("https://"),
            "Qdrant URL must be an http(s) URL, got '{base_url}'"
        );
        anyhow::ensure!(!collection.trim().is_empty(), "missing Qdrant collection name");

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
            headers.insert(
                "api-key",
                HeaderValue::from_str(key).context("invalid Qdrant API key")?,
            );
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("failed to build Qdrant HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            collection,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(self, retry: RetryPolicy) -> Self {
        Self { retry, ..self }
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }

    async fn send<F>(&self, what: &str, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        self.retry
            .send(&format!("Qdrant {what}"), build)
            .await
            .with_context(|| format!("Qdrant {what} request failed"))
    }

    async fn expect_success(what: &str, resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = error_body(resp).await;
        bail!("Qdrant {what} failed ({status}): {body}")
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    fn collection_name(&self) -> &str {
        &self.collection
    }

    fn location(&self) -> String {
        self.base_url.clone()
    }

    async fn collection_exists(&self) -> Result<bool> {
        let url = format!("{}/collections", self.base_url);
        let resp = self.send("list collections", || self.client.get(&url)).await?;
        let resp = Self::expect_success("list collections", resp).await?;
        let listing: QdrantResponse<CollectionList> = resp
            .json()
            .await
            .context("failed to parse Qdrant collection list")?;
        Ok(listing.result.contains(&self.collection))
    }

    async fn create_collection(&self, dimension: usize) -> Result<()> {
        let url = self.collection_url();
        let body = json!({ "vectors": { "size": dimension, "distance": "Cosine" } });
        let resp = self
            .send("create collection", || self.client.put(&url).json(&body))
            .await?;
        Self::expect_success("create collection", resp).await?;
        tracing::info!(
            "Created Qdrant collection '{}' (dimension {})",
            self.collection,
            dimension
        );
        Ok(())
    }

    async fn delete_collection(&self) -> Result<()> {
        let url = self.collection_url();
        let resp = self
            .send("delete collection", || self.client.delete(&url))
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::expect_success("delete collection", resp).await?;
        tracing::info!("Deleted Qdrant collection '{}'", self.collection);
        Ok(())
    }

    async fn upsert(&self, points: Vec<EmbeddedChunk>) -> Result<usize> {
        if points.is_empty() {
            return Ok(0);
        }
        let count = points.len();
        let body = UpsertRequest {
            points: points.into_iter().map(PointStruct::from).collect(),
        };
        let url = format!("{}/points?wait=true", self.collection_url());
        let resp = self
            .send("upsert", || self.client.put(&url).json(&body))
            .await?;
        Self::expect_success("upsert", resp).await?;
        tracing::debug!("Upserted {} points into '{}'", count, self.collection);
        Ok(count)
    }

    async fn search(&self, vector: Vec<f32>, limit: usize) -> Result<Vec<ScoredChunk>> {
        let url = format!("{}/points/search", self.collection_url());
        let body = json!({ "vector": vector, "limit": limit, "with_payload": true });
        let resp = self
            .send("search", || self.client.post(&url).json(&body))
            .await?;
        let resp = Self::expect_success("search", resp).await?;
        let hits: QdrantResponse<Vec<ScoredPoint>> = resp
            .json()
            .await
            .context("failed to parse Qdrant search response")?;
        Ok(hits.result.into_iter().map(ScoredChunk::from).collect())
    }

    async fn collection_info(&self) -> Result<Option<CollectionInfo>> {
        let url = self.collection_url();
        let resp = self.send("collection info", || self.client.get(&url)).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = Self::expect_success("collection info", resp).await?;
        let details: QdrantResponse<CollectionDetails> = resp
            .json()
            .await
            .context("failed to parse Qdrant collection info")?;
        Ok(Some(details.result.into_info(&self.collection)))
    }
}

#[derive(Debug, Deserialize)]
struct QdrantResponse<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct CollectionList {
    #[serde(default)]
    collections: Vec<CollectionName>,
}

#[derive(Debug, Deserialize)]
struct CollectionName {
    name: String,
}

impl CollectionList {
    fn contains(&self, name: &str) -> bool {
        self.collections.iter().any(|c| c.name == name)
    }
}

#[derive(Debug, Deserialize)]
struct CollectionDetails {
    #[serde(default)]
    status: String,
    #[serde(default)]
    points_count: Option<u64>,
    #[serde(default)]
    config: Option<serde_json::Value>,
}

impl CollectionDetails {
    fn into_info(self, name: &str) -> CollectionInfo {
        let dimension = self
            .config
            .as_ref()
            .and_then(|config| config.pointer("/params/vectors/size"))
            .and_then(|size| size.as_u64())
            .map(|size| size as usize);
        CollectionInfo {
            name: name.to_string(),
            status: self.status,
            points_count: self.points_count,
            dimension,
        }
    }
}

#[derive(Debug, Serialize)]
struct UpsertRequest {
    points: Vec<PointStruct>,
}

#[derive(Debug, Serialize)]
struct PointStruct {
    id: u64,
    vector: Vec<f32>,
    payload: Payload,
}

/// Point payload in the `page_content` + `metadata` layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Payload {
    #[serde(default)]
    page_content: String,
    #[serde(default)]
    metadata: PayloadMetadata,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PayloadMetadata {
    #[serde(default)]
    source: String,
    #[serde(default)]
    chunk_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_path: Option<String>,
}

impl From<EmbeddedChunk> for PointStruct {
    fn from(point: EmbeddedChunk) -> Self {
        Self {
            id: point.id,
            vector: point.vector,
            payload: Payload {
                page_content: point.chunk.content,
                metadata: PayloadMetadata {
                    source: point.chunk.source_label,
                    chunk_index: point.chunk.sequence_index,
                    file_path: point.chunk.file_path,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScoredPoint {
    score: f32,
    #[serde(default)]
    payload: Option<Payload>,
}

impl From<ScoredPoint> for ScoredChunk {
    fn from(point: ScoredPoint) -> Self {
        let payload = point.payload.unwrap_or_default();
        ScoredChunk {
            chunk: Chunk {
                content: payload.page_content,
                source_label: payload.metadata.source,
                sequence_index: payload.metadata.chunk_index,
                file_path: payload.metadata.file_path,
            },
            score: point.score,
        }
    }
}
