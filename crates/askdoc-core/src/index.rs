//! Vector index trait

use async_trait::async_trait;

use crate::types::{IndexEntry, ScoredEntry};
use crate::Result;

/// Trait for vector indexes (e.g. a local on-disk index, Qdrant)
///
/// Entries are append-only; the index performs no update or dedup. Search
/// over an empty index returns an empty result rather than an error.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Append entries to durable storage
    async fn append(&self, entries: Vec<IndexEntry>) -> Result<()>;

    /// Return the k entries most similar to the query vector, best first
    async fn search(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredEntry>>;

    /// Delete every entry originating from the given source file
    ///
    /// Only used by the replace-source ingest policy.
    async fn remove_source(&self, source_file: &str) -> Result<()>;

    /// Total number of stored entries
    async fn count(&self) -> Result<usize>;
}
