//! RAG pipeline for askdoc
//!
//! This crate provides the document-to-answer pipeline: PDF ingestion, text
//! chunking, vector index implementations, and the service object tying them
//! together with the embedding and generation providers.

mod chunker;
mod hash_embedder;
mod ingest;
mod local_index;
mod prompt;
mod qdrant_index;
mod service;

pub use chunker::Chunker;
pub use hash_embedder::HashEmbedder;
pub use ingest::PdfLoader;
pub use local_index::LocalIndex;
pub use prompt::PromptBuilder;
pub use qdrant_index::QdrantIndex;
pub use service::RagService;

// Re-export core types for convenience
pub use askdoc_core::{
    Chunk, ChunkMetadata, EmbeddingProvider, Error, GenerationConfig, GenerationProvider,
    IndexEntry, IndexStats, IngestPolicy, IngestReport, PageText, RagConfig, Result, ScoredEntry,
    VectorIndex,
};
