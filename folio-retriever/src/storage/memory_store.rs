use super::{Chunk, CollectionInfo, EmbeddedChunk, PointId, ScoredChunk, VectorStore};
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// In-memory vector store with brute-force cosine search.
///
/// Points are kept ordered by id, so equal scores always come back in the
/// same order.
pub struct MemoryStore {
    name: String,
    collection: RwLock<Option<MemoryCollection>>,
}

struct MemoryCollection {
    dimension: usize,
    points: BTreeMap<PointId, (Chunk, Vec<f32>)>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collection: RwLock::new(None),
        }
    }

    /// Number of stored points, 0 when the collection does not exist.
    pub async fn len(&self) -> usize {
        self.collection
            .read()
            .await
            .as_ref()
            .map(|c| c.points.len())
            .unwrap_or(0)
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    fn collection_name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> String {
        format!("memory://{}", self.name)
    }

    async fn collection_exists(&self) -> Result<bool> {
        Ok(self.collection.read().await.is_some())
    }

    async fn create_collection(&self, dimension: usize) -> Result<()> {
        let mut collection = self.collection.write().await;
        if collection.is_some() {
            bail!("collection '{}' already exists", self.name);
        }
        *collection = Some(MemoryCollection {
            dimension,
            points: BTreeMap::new(),
        });
        Ok(())
    }

    async fn delete_collection(&self) -> Result<()> {
        self.collection.write().await.take();
        Ok(())
    }

    async fn upsert(&self, points: Vec<EmbeddedChunk>) -> Result<usize> {
        let mut guard = self.collection.write().await;
        let Some(collection) = guard.as_mut() else {
            bail!("collection '{}' does not exist", self.name);
        };

        let count = points.len();
        for point in points {
            if point.vector.len() != collection.dimension {
                bail!(
                    "vector of dimension {} does not fit collection of dimension {}",
                    point.vector.len(),
                    collection.dimension
                );
            }
            collection
                .points
                .insert(point.id, (point.chunk, point.vector));
        }
        Ok(count)
    }

    async fn search(&self, vector: Vec<f32>, limit: usize) -> Result<Vec<ScoredChunk>> {
        let guard = self.collection.read().await;
        let Some(collection) = guard.as_ref() else {
            bail!("collection '{}' does not exist", self.name);
        };
        if vector.len() != collection.dimension {
            bail!(
                "query of dimension {} does not fit collection of dimension {}",
                vector.len(),
                collection.dimension
            );
        }

        let mut results: Vec<ScoredChunk> = collection
            .points
            .values()
            .map(|(chunk, embedding)| ScoredChunk {
                chunk: chunk.clone(),
                score: cosine_similarity(&vector, embedding),
            })
            .collect();

        // Stable sort keeps id order among equal scores
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(limit);
        Ok(results)
    }

    async fn collection_info(&self) -> Result<Option<CollectionInfo>> {
        Ok(self
            .collection
            .read()
            .await
            .as_ref()
            .map(|collection| CollectionInfo {
                name: self.name.clone(),
                status: "green".to_string(),
                points_count: Some(collection.points.len() as u64),
                dimension: Some(collection.dimension),
            }))
    }
}

/// Cosine similarity in [-1, 1]; zero vectors score 0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
