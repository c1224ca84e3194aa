//! Generation provider trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

/// Configuration for text generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: u32,
    /// Sampling temperature; 0.0 keeps output randomness at its minimum
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: "gpt-4o-mini".to_string(),
            max_tokens: 512,
            temperature: 0.0,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Trait for generation providers (e.g. OpenAI-compatible chat backends)
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate text for a prompt with the provider's default configuration
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with an explicit configuration
    async fn generate_with_config(&self, prompt: &str, config: &GenerationConfig)
        -> Result<String>;

    /// Identifier of the model used by `generate`
    fn model_id(&self) -> &str;
}
