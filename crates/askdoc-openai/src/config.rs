//! OpenAI configuration

use serde::{Deserialize, Serialize};
use std::env;

use askdoc_core::{Error, Result};

/// Configuration for the OpenAI client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub embedding_model: String,
    pub chat_model: String,
    /// Optional embedding dimension override, forwarded to the API
    pub embedding_dimensions: Option<usize>,
}

impl OpenAiConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            Error::Configuration("OPENAI_API_KEY environment variable not found".to_string())
        })?;

        let base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        let embedding_model = env::var("ASKDOC_EMBEDDING_MODEL")
            .unwrap_or_else(|_| "text-embedding-3-small".to_string());

        let chat_model =
            env::var("ASKDOC_CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let embedding_dimensions = env::var("ASKDOC_EMBEDDING_DIMENSIONS")
            .ok()
            .map(|raw| {
                raw.parse::<usize>().map_err(|_| {
                    Error::Configuration(format!(
                        "ASKDOC_EMBEDDING_DIMENSIONS must be a positive integer, got '{}'",
                        raw
                    ))
                })
            })
            .transpose()?;

        Ok(Self {
            api_key,
            base_url,
            embedding_model,
            chat_model,
            embedding_dimensions,
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            embedding_dimensions: None,
        }
    }
}
