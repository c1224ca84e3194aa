//! Pipeline configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{Error, Result};

/// What to do with a source file's existing entries on re-ingest
///
/// The index performs no deduplication of its own: under `Append` (the
/// default) submitting the same document twice yields duplicate entries.
/// `ReplaceSource` drops all entries carrying the same source file name
/// before appending the new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IngestPolicy {
    #[default]
    Append,
    ReplaceSource,
}

impl FromStr for IngestPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "append" => Ok(Self::Append),
            "replace-source" => Ok(Self::ReplaceSource),
            other => Err(Error::Configuration(format!(
                "unknown ingest policy '{}' (expected 'append' or 'replace-source')",
                other
            ))),
        }
    }
}

/// Configuration for the RAG pipeline
///
/// Supplied at service construction; nothing in the pipeline is hardcoded or
/// process-global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks from the same source
    pub chunk_overlap: usize,
    /// Number of entries retrieved per query
    pub top_k: usize,
    pub ingest_policy: IngestPolicy,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 512,
            chunk_overlap: 64,
            top_k: 3,
            ingest_policy: IngestPolicy::Append,
        }
    }
}

impl RagConfig {
    /// Validate the configuration, returning it for chaining
    pub fn validate(self) -> Result<Self> {
        if self.chunk_size == 0 {
            return Err(Error::Configuration("chunk_size must be positive".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::Configuration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.top_k == 0 {
            return Err(Error::Configuration("top_k must be positive".into()));
        }
        Ok(self)
    }
}
