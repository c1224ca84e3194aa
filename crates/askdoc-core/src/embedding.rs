//! Embedding provider trait

use async_trait::async_trait;

use crate::Result;

/// Trait for embedding providers (e.g. OpenAI, local hashing)
///
/// All entries in one index must come from the same provider configuration,
/// or similarity comparisons become meaningless. The pipeline assumes a
/// single fixed configuration for the lifetime of an index.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, preserving input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Fixed output dimension of this provider
    fn dimension(&self) -> usize;

    /// Identifier of the underlying model
    fn model_id(&self) -> &str;
}
