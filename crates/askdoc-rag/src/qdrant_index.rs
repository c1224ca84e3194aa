//! Qdrant-backed vector index

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;

use qdrant_client::qdrant::{
    point_id::PointIdOptions, value::Kind, Condition, CreateCollectionBuilder,
    DeletePointsBuilder, Distance, Filter, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, Value, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};

use askdoc_core::{ChunkMetadata, Error, IndexEntry, Result, ScoredEntry, VectorIndex};

/// Vector index backed by a Qdrant collection
///
/// The collection is created on connect if it does not exist, with cosine
/// distance and the embedding provider's dimension. Search results carry an
/// empty embedding; the stored vector is never read back.
pub struct QdrantIndex {
    client: Qdrant,
    collection_name: String,
    dimension: u64,
}

impl QdrantIndex {
    /// Connect to Qdrant and ensure the collection exists
    pub async fn connect(url: &str, collection_name: &str, dimension: usize) -> Result<Self> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| Error::Storage(format!("failed to build Qdrant client: {}", e)))?;

        let index = Self {
            client,
            collection_name: collection_name.to_string(),
            dimension: dimension as u64,
        };
        index.ensure_collection().await?;

        Ok(index)
    }

    async fn ensure_collection(&self) -> Result<()> {
        let exists = self
            .client
            .collection_exists(self.collection_name.as_str())
            .await
            .map_err(|e| Error::Storage(format!("failed to query collections: {}", e)))?;

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(self.collection_name.as_str())
                        .vectors_config(VectorParamsBuilder::new(self.dimension, Distance::Cosine)),
                )
                .await
                .map_err(|e| {
                    Error::Storage(format!(
                        "failed to create collection {}: {}",
                        self.collection_name, e
                    ))
                })?;
            tracing::info!(collection = %self.collection_name, "created Qdrant collection");
        }

        Ok(())
    }

    fn entry_payload(entry: &IndexEntry) -> Result<Payload> {
        Payload::try_from(json!({
            "text": entry.text,
            "source_file": entry.metadata.source_file,
            "page_number": entry.metadata.page_number as i64,
            "chunk_index": entry.metadata.chunk_index as i64,
            "indexed_at": entry.indexed_at,
        }))
        .map_err(|e| Error::Storage(format!("failed to build payload: {}", e)))
    }

    fn payload_str(payload: &HashMap<String, Value>, key: &str) -> String {
        match payload.get(key).and_then(|value| value.kind.as_ref()) {
            Some(Kind::StringValue(s)) => s.clone(),
            _ => String::new(),
        }
    }

    fn payload_u32(payload: &HashMap<String, Value>, key: &str) -> u32 {
        match payload.get(key).and_then(|value| value.kind.as_ref()) {
            Some(Kind::IntegerValue(i)) => *i as u32,
            _ => 0,
        }
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn append(&self, entries: Vec<IndexEntry>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut points = Vec::with_capacity(entries.len());
        for entry in &entries {
            if entry.embedding.len() as u64 != self.dimension {
                return Err(Error::Storage(format!(
                    "embedding dimension {} does not match the collection dimension {}",
                    entry.embedding.len(),
                    self.dimension
                )));
            }
            points.push(PointStruct::new(
                entry.id.clone(),
                entry.embedding.clone(),
                Self::entry_payload(entry)?,
            ));
        }

        self.client
            .upsert_points(UpsertPointsBuilder::new(self.collection_name.as_str(), points).wait(true))
            .await
            .map_err(|e| Error::Storage(format!("failed to upsert points: {}", e)))?;

        Ok(())
    }

    async fn search(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredEntry>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(self.collection_name.as_str(), vector.to_vec(), k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| Error::Storage(format!("search failed: {}", e)))?;

        let mut results = Vec::with_capacity(response.result.len());
        for point in response.result {
            let id = match point.id.and_then(|id| id.point_id_options) {
                Some(PointIdOptions::Uuid(uuid)) => uuid,
                Some(PointIdOptions::Num(num)) => num.to_string(),
                None => String::new(),
            };

            let payload = point.payload;
            results.push(ScoredEntry {
                entry: IndexEntry {
                    id,
                    text: Self::payload_str(&payload, "text"),
                    metadata: ChunkMetadata {
                        source_file: Self::payload_str(&payload, "source_file"),
                        page_number: Self::payload_u32(&payload, "page_number"),
                        chunk_index: Self::payload_u32(&payload, "chunk_index"),
                    },
                    embedding: Vec::new(),
                    indexed_at: Self::payload_str(&payload, "indexed_at"),
                },
                score: point.score,
            });
        }

        Ok(results)
    }

    async fn remove_source(&self, source_file: &str) -> Result<()> {
        self.client
            .delete_points(
                DeletePointsBuilder::new(self.collection_name.as_str())
                    .points(Filter::must([Condition::matches(
                        "source_file",
                        source_file.to_string(),
                    )]))
                    .wait(true),
            )
            .await
            .map_err(|e| Error::Storage(format!("failed to delete points: {}", e)))?;

        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let info = self
            .client
            .collection_info(self.collection_name.as_str())
            .await
            .map_err(|e| Error::Storage(format!("failed to read collection info: {}", e)))?;

        Ok(info
            .result
            .and_then(|info| info.points_count)
            .unwrap_or(0) as usize)
    }
}
