//! OpenAI client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

use askdoc_core::{
    EmbeddingProvider, Error, GenerationConfig, GenerationProvider, Result,
};

use crate::config::OpenAiConfig;

/// Client for OpenAI-compatible embedding and chat completion endpoints
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: Client,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Model constants
    pub const TEXT_EMBEDDING_3_SMALL: &'static str = "text-embedding-3-small";
    pub const TEXT_EMBEDDING_3_LARGE: &'static str = "text-embedding-3-large";

    /// Create a new OpenAI client from configuration
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::ExternalService(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new OpenAI client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = OpenAiConfig::from_env()?;
        Self::new(config)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn perform_embedding(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        let request_body = EmbeddingRequest {
            model: &self.config.embedding_model,
            input: inputs,
            dimensions: self.config.embedding_dimensions,
        };

        let response = self
            .client
            .post(self.endpoint("embeddings"))
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::ExternalService(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(Error::ExternalService(format!(
                "embedding request failed with status {}: {}",
                status, error_text
            )));
        }

        let mut parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::ExternalService(format!("failed to parse embedding response: {}", e)))?;

        if parsed.data.len() != inputs.len() {
            return Err(Error::ExternalService(format!(
                "embedding backend returned {} vectors for {} inputs",
                parsed.data.len(),
                inputs.len()
            )));
        }

        // The API does not guarantee response order
        parsed.data.sort_by_key(|entry| entry.index);

        Ok(parsed.data.into_iter().map(|entry| entry.embedding).collect())
    }

    async fn perform_generation(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        let request_body = ChatRequest {
            model: &config.model_id,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::ExternalService(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(Error::ExternalService(format!(
                "chat completion request failed with status {}: {}",
                status, error_text
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::ExternalService(format!("failed to parse chat response: {}", e)))?;

        let answer = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if answer.trim().is_empty() {
            return Err(Error::ExternalService(
                "empty response from chat completion backend".to_string(),
            ));
        }

        Ok(answer.trim().to_string())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let inputs = [text.to_string()];
        let mut vectors = self.perform_embedding(&inputs).await?;
        vectors
            .pop()
            .ok_or_else(|| Error::ExternalService("embedding backend returned no vector".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.perform_embedding(texts).await
    }

    fn dimension(&self) -> usize {
        if let Some(dimensions) = self.config.embedding_dimensions {
            return dimensions;
        }
        match self.config.embedding_model.as_str() {
            Self::TEXT_EMBEDDING_3_LARGE => 3072,
            _ => 1536,
        }
    }

    fn model_id(&self) -> &str {
        &self.config.embedding_model
    }
}

#[async_trait]
impl GenerationProvider for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let config = GenerationConfig {
            model_id: self.config.chat_model.clone(),
            ..Default::default()
        };
        self.generate_with_config(prompt, &config).await
    }

    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String> {
        let generation_future = self.perform_generation(prompt, config);

        match timeout(config.timeout, generation_future).await {
            Ok(result) => result,
            Err(_) => Err(Error::ExternalService(
                "generation request timed out".to_string(),
            )),
        }
    }

    fn model_id(&self) -> &str {
        &self.config.chat_model
    }
}
