//! Deterministic hashing embedder

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use askdoc_core::{EmbeddingProvider, Result};

/// Embedding provider with no external dependency
///
/// Projects word and bigram hashes into a fixed-dimension vector and
/// L2-normalizes the result. The output is deterministic, so it satisfies the
/// single-embedding-configuration invariant, and word overlap between texts
/// still translates into cosine similarity. Useful for offline runs and
/// tests; retrieval quality is far below a learned embedding model.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub const DEFAULT_DIMENSION: usize = 384;

    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn hash_token(token: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        hasher.finish()
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let normalized = text.to_lowercase();
        let words: Vec<&str> = normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let mut vector = vec![0.0f32; self.dimension];

        for (position, word) in words.iter().enumerate() {
            let hash = Self::hash_token(word);
            // earlier words weigh more
            let weight = 1.0 / (1.0 + position as f32 * 0.1);

            let primary = (hash % self.dimension as u64) as usize;
            let secondary = ((hash >> 16) % self.dimension as u64) as usize;
            vector[primary] += weight;
            vector[secondary] += weight * 0.5;
        }

        for pair in words.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            let index = (Self::hash_token(&bigram) % self.dimension as u64) as usize;
            vector[index] += 0.3;
        }

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in vector.iter_mut() {
                *value /= magnitude;
            }
        }

        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        "hash-embedder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn embeddings_are_deterministic_and_normalized() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed_text("the sky is blue");
        let b = embedder.embed_text("the sky is blue");
        assert_eq!(a, b);

        let magnitude: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 1e-5);
    }

    #[test]
    fn similar_texts_score_higher_than_unrelated_ones() {
        let embedder = HashEmbedder::default();
        let query = embedder.embed_text("what color is the sky");
        let on_topic = embedder.embed_text("The sky is blue.");
        let off_topic = embedder.embed_text("Invoices are due within thirty days.");

        assert!(cosine(&query, &on_topic) > cosine(&query, &off_topic));
    }

    #[test]
    fn empty_text_embeds_to_the_zero_vector() {
        let embedder = HashEmbedder::default();
        let vector = embedder.embed_text("");
        assert!(vector.iter().all(|v| *v == 0.0));
        assert_eq!(vector.len(), HashEmbedder::DEFAULT_DIMENSION);
    }
}
