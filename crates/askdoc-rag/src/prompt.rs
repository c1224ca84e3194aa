//! Prompt composition for retrieval-augmented answers

use askdoc_core::ScoredEntry;

/// Builds the single "stuff" prompt sent to the generation provider
///
/// All retrieved chunk texts are concatenated into one context block; there
/// is no iterative summarization or re-ranking. An empty retrieval set
/// produces a prompt with an empty context block, and the model answers
/// best-effort with whatever it received.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Concatenate retrieved chunk texts into a context block
    pub fn build_context(entries: &[ScoredEntry]) -> String {
        entries
            .iter()
            .map(|scored| scored.entry.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Compose the question-answering prompt
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            "Use the following pieces of context to answer the question at the end. \
             If you don't know the answer, just say that you don't know, don't try to \
             make up an answer.\n\n{context}\n\nQuestion: {question}\nHelpful Answer:"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use askdoc_core::{ChunkMetadata, IndexEntry};

    fn scored(text: &str) -> ScoredEntry {
        ScoredEntry {
            entry: IndexEntry {
                id: "id".to_string(),
                text: text.to_string(),
                metadata: ChunkMetadata {
                    source_file: "doc.pdf".to_string(),
                    page_number: 1,
                    chunk_index: 0,
                },
                embedding: Vec::new(),
                indexed_at: String::new(),
            },
            score: 1.0,
        }
    }

    #[test]
    fn context_concatenates_entries_in_order() {
        let entries = vec![scored("first"), scored("second")];
        assert_eq!(PromptBuilder::build_context(&entries), "first\n\nsecond");
    }

    #[test]
    fn prompt_contains_context_and_question() {
        let prompt = PromptBuilder::build_qa_prompt("What color is the sky?", "The sky is blue.");
        assert!(prompt.contains("The sky is blue."));
        assert!(prompt.contains("Question: What color is the sky?"));
        assert!(prompt.ends_with("Helpful Answer:"));
    }

    #[test]
    fn empty_context_still_yields_a_complete_prompt() {
        let prompt = PromptBuilder::build_qa_prompt("Anything?", "");
        assert!(prompt.contains("Question: Anything?"));
        assert!(prompt.ends_with("Helpful Answer:"));
    }
}
