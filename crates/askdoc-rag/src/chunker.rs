//! Recursive text chunking with overlap

use std::collections::VecDeque;

use askdoc_core::{Error, Result};

/// Separators tried in order of decreasing granularity: paragraph, line,
/// sentence, word. Text that still exceeds the target after the last one is
/// cut into raw character windows.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// Splits text into overlapping chunks of a bounded size
///
/// The splitter recursively breaks text on the coarsest separator that still
/// occurs in it, then re-merges the pieces into chunks no larger than
/// `chunk_size`, carrying roughly `overlap` characters of shared text across
/// adjacent chunk boundaries. Deterministic for a given input and
/// configuration.
#[derive(Debug, Clone)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    /// Create a new chunker
    ///
    /// `overlap >= chunk_size` would make the merge step loop on the same
    /// window forever and is rejected as a configuration error.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Configuration("chunk_size must be positive".into()));
        }
        if overlap >= chunk_size {
            return Err(Error::Configuration(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Split text into chunks
    pub fn split(&self, text: &str) -> Vec<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        if trimmed.len() <= self.chunk_size {
            return vec![trimmed.to_string()];
        }
        self.split_with(trimmed, &SEPARATORS)
    }

    fn split_with(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let Some(position) = separators.iter().position(|sep| text.contains(sep)) else {
            return self.char_windows(text);
        };
        let separator = separators[position];
        let finer = &separators[position + 1..];

        let mut pieces: Vec<String> = Vec::new();
        for part in text.split(separator) {
            if part.is_empty() {
                continue;
            }
            if part.len() <= self.chunk_size {
                pieces.push(part.to_string());
            } else if !finer.is_empty() {
                pieces.extend(self.split_with(part, finer));
            } else {
                pieces.extend(self.char_windows(part));
            }
        }

        self.merge(pieces, separator)
    }

    /// Merge pieces into chunks, retaining an overlap-sized tail of pieces as
    /// the start of the next chunk
    fn merge(&self, pieces: Vec<String>, separator: &str) -> Vec<String> {
        let sep_len = separator.len();
        let mut chunks = Vec::new();
        let mut window: VecDeque<String> = VecDeque::new();
        let mut window_len = 0usize;

        for piece in pieces {
            let extra = if window.is_empty() {
                piece.len()
            } else {
                piece.len() + sep_len
            };

            if !window.is_empty() && window_len + extra > self.chunk_size {
                chunks.push(Self::join(&window, separator));
                while window_len > self.overlap
                    || window_len + piece.len() + sep_len > self.chunk_size
                {
                    let Some(removed) = window.pop_front() else {
                        break;
                    };
                    window_len -= removed.len();
                    if !window.is_empty() {
                        window_len -= sep_len;
                    }
                }
            }

            if !window.is_empty() {
                window_len += sep_len;
            }
            window_len += piece.len();
            window.push_back(piece);
        }

        if !window.is_empty() {
            chunks.push(Self::join(&window, separator));
        }

        chunks
    }

    /// Last-resort split for text with no usable separator, e.g. one very
    /// long token: fixed character windows advancing by size minus overlap
    fn char_windows(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = self.chunk_size - self.overlap;
        let mut windows = Vec::new();
        let mut start = 0usize;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            windows.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }

        windows
    }

    fn join(window: &VecDeque<String>, separator: &str) -> String {
        window
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }
}
