//! Core traits and types for askdoc
//!
//! This crate defines the fundamental traits and types used across the askdoc
//! system. It provides capability-facing interfaces for embedding providers,
//! vector indexes, and generation providers, making the pipeline test-friendly
//! and each backend independently substitutable.

pub mod config;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod types;

pub use config::{IngestPolicy, RagConfig};
pub use embedding::EmbeddingProvider;
pub use error::{Error, Result};
pub use generation::{GenerationConfig, GenerationProvider};
pub use index::VectorIndex;
pub use types::{Chunk, ChunkMetadata, IndexEntry, IndexStats, IngestReport, PageText, ScoredEntry};
