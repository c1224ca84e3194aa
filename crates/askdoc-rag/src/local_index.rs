//! File-backed local vector index

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use askdoc_core::{Error, IndexEntry, Result, ScoredEntry, VectorIndex};

const DATA_FILE: &str = "index.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct IndexFile {
    /// Dimension of the stored vectors, fixed by the first append
    dimension: Option<usize>,
    entries: Vec<IndexEntry>,
}

/// Vector index persisted as a JSON file in a configured directory
///
/// Entries are held in memory and flushed to disk on every mutation, so the
/// index survives process restarts. Search is a full cosine scan, which is
/// plenty for the document counts this service targets.
pub struct LocalIndex {
    data_file: PathBuf,
    state: RwLock<IndexFile>,
}

impl LocalIndex {
    /// Open (or create) the index stored under the given directory
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .map_err(|e| Error::Storage(format!("failed to create {}: {}", dir.display(), e)))?;

        let data_file = dir.join(DATA_FILE);
        let state = if data_file.exists() {
            Self::load(&data_file)?
        } else {
            IndexFile::default()
        };

        Ok(Self {
            data_file,
            state: RwLock::new(state),
        })
    }

    fn load(path: &Path) -> Result<IndexFile> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Storage(format!("failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Storage(format!("corrupt index file {}: {}", path.display(), e)))
    }

    fn persist(&self, state: &IndexFile) -> Result<()> {
        let content = serde_json::to_string(state)
            .map_err(|e| Error::Storage(format!("failed to serialize index: {}", e)))?;
        fs::write(&self.data_file, content).map_err(|e| {
            Error::Storage(format!("failed to write {}: {}", self.data_file.display(), e))
        })
    }
}

#[async_trait]
impl VectorIndex for LocalIndex {
    async fn append(&self, entries: Vec<IndexEntry>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut state = self.state.write().await;
        let dimension = state.dimension.unwrap_or(entries[0].embedding.len());
        for entry in &entries {
            if entry.embedding.len() != dimension {
                return Err(Error::Storage(format!(
                    "embedding dimension {} does not match the index dimension {}",
                    entry.embedding.len(),
                    dimension
                )));
            }
        }

        state.dimension = Some(dimension);
        state.entries.extend(entries);
        self.persist(&state)
    }

    async fn search(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredEntry>> {
        let state = self.state.read().await;

        let mut scored: Vec<ScoredEntry> = state
            .entries
            .iter()
            .map(|entry| ScoredEntry {
                score: cosine_similarity(vector, &entry.embedding),
                entry: entry.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    async fn remove_source(&self, source_file: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.entries.len();
        state
            .entries
            .retain(|entry| entry.metadata.source_file != source_file);
        if state.entries.len() != before {
            self.persist(&state)?;
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.state.read().await.entries.len())
    }
}

/// Cosine similarity between two vectors of equal length
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot / (magnitude_a * magnitude_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use askdoc_core::ChunkMetadata;

    fn entry(id: &str, source: &str, embedding: Vec<f32>) -> IndexEntry {
        IndexEntry {
            id: id.to_string(),
            text: format!("text of {}", id),
            metadata: ChunkMetadata {
                source_file: source.to_string(),
                page_number: 1,
                chunk_index: 0,
            },
            embedding,
            indexed_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn search_returns_at_most_k_entries_best_first() {
        let dir = tempfile::tempdir().unwrap();
        let index = LocalIndex::open(dir.path()).unwrap();

        index
            .append(vec![
                entry("a", "doc.pdf", vec![1.0, 0.0]),
                entry("b", "doc.pdf", vec![0.7, 0.7]),
                entry("c", "doc.pdf", vec![0.0, 1.0]),
            ])
            .await
            .unwrap();

        let results = index.search(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].entry.id, "a");
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn empty_index_searches_to_an_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let index = LocalIndex::open(dir.path()).unwrap();
        let results = index.search(&[1.0, 0.0], 3).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn entries_survive_a_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let index = LocalIndex::open(dir.path()).unwrap();
            index
                .append(vec![entry("a", "doc.pdf", vec![1.0, 0.0])])
                .await
                .unwrap();
        }

        let reopened = LocalIndex::open(dir.path()).unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
        let results = reopened.search(&[1.0, 0.0], 1).await.unwrap();
        assert_eq!(results[0].entry.id, "a");
    }

    #[tokio::test]
    async fn duplicate_appends_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let index = LocalIndex::open(dir.path()).unwrap();

        index
            .append(vec![entry("a", "doc.pdf", vec![1.0, 0.0])])
            .await
            .unwrap();
        index
            .append(vec![entry("a", "doc.pdf", vec![1.0, 0.0])])
            .await
            .unwrap();

        assert_eq!(index.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn remove_source_only_touches_matching_entries() {
        let dir = tempfile::tempdir().unwrap();
        let index = LocalIndex::open(dir.path()).unwrap();

        index
            .append(vec![
                entry("a", "first.pdf", vec![1.0, 0.0]),
                entry("b", "second.pdf", vec![0.0, 1.0]),
            ])
            .await
            .unwrap();

        index.remove_source("first.pdf").await.unwrap();
        assert_eq!(index.count().await.unwrap(), 1);
        let results = index.search(&[0.0, 1.0], 5).await.unwrap();
        assert_eq!(results[0].entry.metadata.source_file, "second.pdf");
    }

    #[tokio::test]
    async fn mismatched_dimensions_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let index = LocalIndex::open(dir.path()).unwrap();

        index
            .append(vec![entry("a", "doc.pdf", vec![1.0, 0.0])])
            .await
            .unwrap();
        let err = index
            .append(vec![entry("b", "doc.pdf", vec![1.0, 0.0, 0.0])])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }
}
