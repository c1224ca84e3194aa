//! PDF document ingestion

use std::path::Path;

use askdoc_core::{Error, PageText, Result};

/// Extracts page-wise text from PDF documents
///
/// Loading validates the document structure first, then extracts text one
/// page at a time. Documents from which no text can be extracted (image-only
/// scans, encrypted files) fail ingestion; OCR is out of scope.
pub struct PdfLoader;

impl PdfLoader {
    /// Load a PDF from disk and extract its page texts
    pub fn load(path: &Path) -> Result<Vec<PageText>> {
        let data = std::fs::read(path)
            .map_err(|e| Error::Ingestion(format!("failed to read {}: {}", path.display(), e)))?;
        Self::load_bytes(&data)
    }

    /// Extract page texts from in-memory PDF bytes
    pub fn load_bytes(data: &[u8]) -> Result<Vec<PageText>> {
        // Structural validation up front gives a clearer error than the text
        // extractor's parse failures
        let document = lopdf::Document::load_mem(data)
            .map_err(|e| Error::Ingestion(format!("not a valid PDF: {}", e)))?;
        let page_count = document.get_pages().len();
        drop(document);

        let raw_pages = match pdf_extract::extract_text_from_mem_by_pages(data) {
            Ok(pages) => pages,
            Err(per_page_err) => {
                tracing::warn!(
                    "page-wise extraction failed ({}), falling back to whole-document text",
                    per_page_err
                );
                let text = pdf_extract::extract_text_from_mem(data).map_err(|e| {
                    Error::Ingestion(format!("failed to extract PDF text: {}", e))
                })?;
                vec![text]
            }
        };

        let mut pages = Vec::new();
        for (index, raw) in raw_pages.iter().enumerate() {
            let text = normalize_text(raw);
            if text.is_empty() {
                continue;
            }
            pages.push(PageText {
                page_number: index as u32 + 1,
                text,
            });
        }

        if pages.is_empty() {
            return Err(Error::Ingestion(
                "no text content could be extracted from the PDF".to_string(),
            ));
        }

        tracing::debug!(
            pages_with_text = pages.len(),
            total_pages = page_count,
            "extracted PDF text"
        );

        Ok(pages)
    }
}

/// Clean up extracted text: strip NUL bytes, trim line edges, and collapse
/// blank-line runs to a single paragraph break
pub fn normalize_text(raw: &str) -> String {
    let cleaned = raw.replace('\u{0}', "");
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = true;

    for line in cleaned.lines().map(str::trim) {
        if line.is_empty() {
            if !previous_blank {
                lines.push("");
            }
            previous_blank = true;
        } else {
            previous_blank = false;
            lines.push(line);
        }
    }

    while lines.last() == Some(&"") {
        lines.pop();
    }

    lines.join("\n")
}

/// md5 checksum over text content, used for ingest reporting
pub fn checksum(text: &str) -> String {
    format!("{:x}", md5::compute(text.as_bytes()))
}
