//! Data model shared across the pipeline

use serde::{Deserialize, Serialize};

/// Text extracted from a single document page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// Page number, 1-indexed
    pub page_number: u32,
    pub text: String,
}

/// Metadata attached to a chunk at creation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Originating file name (basename, no path components)
    pub source_file: String,
    /// Page the chunk was cut from, 1-indexed
    pub page_number: u32,
    /// Sequential position of the chunk within its document
    pub chunk_index: u32,
}

/// A contiguous span of document text used as the retrieval unit
///
/// Chunks are immutable once created; re-ingesting a document produces new
/// chunks rather than mutating existing ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: ChunkMetadata,
}

/// The persisted tuple stored in a vector index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
    pub embedding: Vec<f32>,
    /// RFC3339 timestamp of when the entry was appended
    pub indexed_at: String,
}

/// An index entry paired with its similarity to a query vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredEntry {
    pub entry: IndexEntry,
    /// Cosine similarity, higher is better
    pub score: f32,
}

/// Summary of a completed ingestion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub source_file: String,
    /// md5 checksum of the extracted document text
    pub checksum: String,
    pub pages: usize,
    pub chunks_indexed: usize,
}

/// Aggregate information about a vector index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    pub entries: usize,
}
