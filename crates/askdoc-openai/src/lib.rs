//! OpenAI-compatible backends for askdoc
//!
//! This crate provides the OpenAI implementations of the `EmbeddingProvider`
//! and `GenerationProvider` traits. Any endpoint speaking the OpenAI wire
//! format works by overriding the base URL.

mod client;
mod config;

#[cfg(test)]
mod tests;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;

// Re-export core types for convenience
pub use askdoc_core::{EmbeddingProvider, GenerationConfig, GenerationProvider, Error, Result};
