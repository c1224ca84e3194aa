//! The RAG service object

use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use askdoc_core::{
    Chunk, ChunkMetadata, EmbeddingProvider, Error, GenerationProvider, IndexEntry, IndexStats,
    IngestPolicy, IngestReport, PageText, RagConfig, Result, VectorIndex,
};

use crate::chunker::Chunker;
use crate::ingest::{self, PdfLoader};
use crate::prompt::PromptBuilder;

/// The document-to-answer pipeline
///
/// Explicitly constructed with its configuration and the three capability
/// providers; request handlers share one instance. The service keeps no
/// state of its own between requests — everything persisted lives in the
/// vector index.
pub struct RagService {
    config: RagConfig,
    chunker: Chunker,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    generator: Arc<dyn GenerationProvider>,
}

impl RagService {
    /// Create a new service, validating the configuration
    pub fn new(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        generator: Arc<dyn GenerationProvider>,
    ) -> Result<Self> {
        let config = config.validate()?;
        let chunker = Chunker::new(config.chunk_size, config.chunk_overlap)?;

        Ok(Self {
            config,
            chunker,
            embedder,
            index,
            generator,
        })
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Ingest a PDF file: extract, chunk, embed, and append to the index
    ///
    /// Blocks until the document is fully persisted. A failure part-way
    /// through does not roll back entries that were already appended; the
    /// caller re-submits the whole document.
    pub async fn ingest_file(&self, path: &Path) -> Result<IngestReport> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::InvalidInput("path has no usable file name".to_string()))?;

        if !file_name.to_lowercase().ends_with(".pdf") {
            return Err(Error::InvalidInput(format!(
                "'{}' is not a PDF file; only PDF uploads are accepted",
                file_name
            )));
        }

        let pages = PdfLoader::load(path)?;
        self.ingest_pages(file_name, &pages).await
    }

    /// Ingest pre-extracted page texts under the given source name
    pub async fn ingest_pages(&self, source_file: &str, pages: &[PageText]) -> Result<IngestReport> {
        if let IngestPolicy::ReplaceSource = self.config.ingest_policy {
            self.index.remove_source(source_file).await?;
        }

        let mut chunks: Vec<Chunk> = Vec::new();
        for page in pages {
            for text in self.chunker.split(&page.text) {
                let metadata = ChunkMetadata {
                    source_file: source_file.to_string(),
                    page_number: page.page_number,
                    chunk_index: chunks.len() as u32,
                };
                chunks.push(Chunk { text, metadata });
            }
        }

        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(Error::ExternalService(format!(
                "embedding backend returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        let indexed_at = chrono::Utc::now().to_rfc3339();
        let entries: Vec<IndexEntry> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, embedding)| IndexEntry {
                id: Uuid::new_v4().to_string(),
                text: chunk.text,
                metadata: chunk.metadata,
                embedding,
                indexed_at: indexed_at.clone(),
            })
            .collect();
        let chunks_indexed = entries.len();

        self.index.append(entries).await?;

        let full_text: String = pages
            .iter()
            .map(|page| page.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        tracing::info!(
            source_file,
            pages = pages.len(),
            chunks = chunks_indexed,
            "ingested document"
        );

        Ok(IngestReport {
            source_file: source_file.to_string(),
            checksum: ingest::checksum(&full_text),
            pages: pages.len(),
            chunks_indexed,
        })
    }

    /// Answer a question from the indexed documents
    ///
    /// Embeds the question, retrieves the top-k most similar chunks, stuffs
    /// them into a single prompt, and calls the generation provider once.
    /// An empty index still produces a best-effort answer.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::InvalidInput("question must not be empty".to_string()));
        }

        let vector = self.embedder.embed(question).await?;
        let retrieved = self.index.search(&vector, self.config.top_k).await?;
        tracing::debug!(retrieved = retrieved.len(), "retrieved context for question");

        let context = PromptBuilder::build_context(&retrieved);
        let prompt = PromptBuilder::build_qa_prompt(question, &context);

        self.generator.generate(&prompt).await
    }

    /// Aggregate index statistics
    pub async fn stats(&self) -> Result<IndexStats> {
        Ok(IndexStats {
            entries: self.index.count().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_embedder::HashEmbedder;
    use crate::ingest::tests::pdf_with_text;
    use crate::local_index::LocalIndex;
    use async_trait::async_trait;
    use tempfile::TempDir;

    /// Generation fake that returns the prompt it was handed, so assertions
    /// can check what context reached the model
    struct EchoGenerator;

    #[async_trait]
    impl GenerationProvider for EchoGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(prompt.to_string())
        }

        async fn generate_with_config(
            &self,
            prompt: &str,
            _config: &askdoc_core::GenerationConfig,
        ) -> Result<String> {
            Ok(prompt.to_string())
        }

        fn model_id(&self) -> &str {
            "echo"
        }
    }

    fn service_with(dir: &TempDir, config: RagConfig) -> RagService {
        let index = Arc::new(LocalIndex::open(dir.path()).unwrap());
        RagService::new(
            config,
            Arc::new(HashEmbedder::default()),
            index,
            Arc::new(EchoGenerator),
        )
        .unwrap()
    }

    fn default_service(dir: &TempDir) -> RagService {
        service_with(dir, RagConfig::default())
    }

    fn page(text: &str) -> PageText {
        PageText {
            page_number: 1,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn end_to_end_sky_question() {
        let dir = tempfile::tempdir().unwrap();
        let service = default_service(&dir);

        let report = service
            .ingest_pages("sky.pdf", &[page("The sky is blue.")])
            .await
            .unwrap();
        assert_eq!(report.chunks_indexed, 1);
        assert_eq!(report.pages, 1);

        let answer = service.answer("What color is the sky?").await.unwrap();
        assert!(answer.contains("blue"), "answer was: {}", answer);
    }

    #[tokio::test]
    async fn retrieval_prefers_the_relevant_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let service = default_service(&dir);

        service
            .ingest_pages("sky.pdf", &[page("The sky is blue.")])
            .await
            .unwrap();
        service
            .ingest_pages(
                "invoices.pdf",
                &[page("Invoices are due within thirty days of receipt.")],
            )
            .await
            .unwrap();

        let vector = service
            .embedder
            .embed("what color is the sky")
            .await
            .unwrap();
        let results = service.index.search(&vector, 1).await.unwrap();
        assert_eq!(results[0].entry.metadata.source_file, "sky.pdf");
    }

    #[tokio::test]
    async fn reingesting_duplicates_entries_under_append_policy() {
        let dir = tempfile::tempdir().unwrap();
        let service = default_service(&dir);

        service
            .ingest_pages("doc.pdf", &[page("The sky is blue.")])
            .await
            .unwrap();
        service
            .ingest_pages("doc.pdf", &[page("The sky is blue.")])
            .await
            .unwrap();

        assert_eq!(service.stats().await.unwrap().entries, 2);
    }

    #[tokio::test]
    async fn replace_source_policy_drops_previous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let config = RagConfig {
            ingest_policy: IngestPolicy::ReplaceSource,
            ..Default::default()
        };
        let service = service_with(&dir, config);

        service
            .ingest_pages("doc.pdf", &[page("The sky is blue.")])
            .await
            .unwrap();
        service
            .ingest_pages("doc.pdf", &[page("The sky is gray today.")])
            .await
            .unwrap();

        assert_eq!(service.stats().await.unwrap().entries, 1);
    }

    #[tokio::test]
    async fn empty_index_still_answers_best_effort() {
        let dir = tempfile::tempdir().unwrap();
        let service = default_service(&dir);

        let answer = service.answer("What color is the sky?").await.unwrap();
        assert!(answer.contains("What color is the sky?"));
    }

    #[tokio::test]
    async fn blank_question_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let service = default_service(&dir);

        let err = service.answer("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn non_pdf_file_is_rejected_without_indexing() {
        let dir = tempfile::tempdir().unwrap();
        let service = default_service(&dir);

        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "plain text").unwrap();

        let err = service.ingest_file(&notes).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(service.stats().await.unwrap().entries, 0);
    }

    #[tokio::test]
    async fn corrupt_pdf_is_an_ingestion_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = default_service(&dir);

        let bogus = dir.path().join("bogus.pdf");
        std::fs::write(&bogus, b"not really a pdf").unwrap();

        let err = service.ingest_file(&bogus).await.unwrap_err();
        assert!(matches!(err, Error::Ingestion(_)));
        assert_eq!(service.stats().await.unwrap().entries, 0);
    }

    #[tokio::test]
    async fn ingest_file_processes_a_real_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let service = default_service(&dir);

        let path = dir.path().join("sky.pdf");
        std::fs::write(&path, pdf_with_text("The sky is blue.")).unwrap();

        let report = service.ingest_file(&path).await.unwrap();
        assert_eq!(report.source_file, "sky.pdf");
        assert!(report.chunks_indexed >= 1);

        let answer = service.answer("What color is the sky?").await.unwrap();
        assert!(answer.contains("blue"));
    }

    #[tokio::test]
    async fn long_documents_produce_bounded_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let service = default_service(&dir);

        let long_text = "The quick brown fox jumps over the lazy dog. ".repeat(60);
        let report = service
            .ingest_pages("long.pdf", &[page(&long_text)])
            .await
            .unwrap();
        assert!(report.chunks_indexed > 1);

        let vector = service.embedder.embed("quick brown fox").await.unwrap();
        let results = service.index.search(&vector, 50).await.unwrap();
        for result in &results {
            assert!(result.entry.text.len() <= service.config().chunk_size);
        }
    }
}
