//! Recursive character splitting of source documents into overlapping chunks.
//!
//! The splitter works through an ordered list of separators, from the most
//! significant (blank lines between speeches) to the least (single
//! characters). Text is cut on the first separator that occurs in it; pieces
//! that are still larger than the chunk size are split again with the
//! remaining separators. Small pieces are then merged back together greedily
//! until a chunk is full, and the tail of each full chunk (up to the configured
//! overlap) is carried into the next one so that a passage spanning a chunk
//! boundary is still retrievable as a whole.
//!
//! Lengths are measured in characters, not bytes, so multi-byte text is never
//! cut in the middle of a character.
//!
//! # Example
//!
//! ```
//! use folio_context::text::{TextSplitter, DEFAULT_SEPARATORS};
//!
//! let splitter = TextSplitter::new(DEFAULT_SEPARATORS, 40, 10);
//! let text = "To be, or not to be, that is the question:\n\
//!             Whether 'tis nobler in the mind to suffer\n\
//!             The slings and arrows of outrageous fortune";
//!
//! let chunks = splitter.split_text(text);
//! assert!(chunks.len() > 1);
//! assert!(chunks.iter().all(|c| c.chars().count() <= 40));
//! ```
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Separators tried in order: paragraphs, lines, words, then characters.
///
/// The empty string means "split between every character" and must come last.
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

/// Maximum chunk length in characters used when indexing the corpus.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Number of trailing characters repeated at the start of the following chunk.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// A chunk of a source document together with the metadata stored alongside
/// it in the similarity index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Human-readable origin of the chunk, usually the title of the work.
    pub source: String,
    /// Path of the file the chunk was read from.
    pub file_path: String,
    /// Position of the chunk within its document (0-indexed).
    pub sequence: usize,
    /// The chunk text itself.
    pub text: String,
}

#[derive(Debug, Clone)]
struct Separator {
    /// `None` splits between every character.
    literal: Option<String>,
}

impl Separator {
    fn new(literal: &str) -> Self {
        Self {
            literal: (!literal.is_empty()).then(|| literal.to_string()),
        }
    }

    fn occurs_in(&self, text: &str) -> bool {
        match &self.literal {
            Some(literal) => text.contains(literal.as_str()),
            None => true,
        }
    }

    /// Split `text` keeping each separator attached to the start of the
    /// piece that follows it. Empty pieces are dropped.
    fn split<'t>(&self, text: &'t str) -> Vec<&'t str> {
        match &self.literal {
            None => text
                .char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect(),
            Some(literal) => {
                let mut pieces = Vec::new();
                let mut start = 0;
                for (at, _) in text.match_indices(literal.as_str()) {
                    if at > start {
                        pieces.push(&text[start..at]);
                    }
                    start = at;
                }
                if start < text.len() {
                    pieces.push(&text[start..]);
                }
                pieces
            }
        }
    }
}

/// Splits text into chunks of at most `chunk_size` characters with
/// `chunk_overlap` characters of overlap between neighbours.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    separators: Vec<Separator>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATORS, DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl TextSplitter {
    /// Creates a splitter from literal separators.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero or `chunk_overlap` is larger than
    /// `chunk_size`.
    pub fn new(separators: &[&str], chunk_size: usize, chunk_overlap: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be positive");
        assert!(
            chunk_overlap <= chunk_size,
            "chunk overlap ({chunk_overlap}) is larger than chunk size ({chunk_size})"
        );

        Self {
            separators: separators.iter().map(|s| Separator::new(s)).collect(),
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Splits `text` into trimmed, non-empty chunks in document order.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    /// Splits a whole document and attaches source metadata to every chunk.
    pub fn chunk_document(&self, source: &str, file_path: &str, content: &str) -> Vec<TextChunk> {
        let chunks: Vec<TextChunk> = self
            .split_text(content)
            .into_iter()
            .enumerate()
            .map(|(sequence, text)| TextChunk {
                source: source.to_string(),
                file_path: file_path.to_string(),
                sequence,
                text,
            })
            .collect();

        tracing::debug!(
            "Chunked {} into {} chunks (size {}, overlap {})",
            file_path,
            chunks.len(),
            self.chunk_size,
            self.chunk_overlap
        );

        chunks
    }

    fn split_recursive(&self, text: &str, separators: &[Separator]) -> Vec<String> {
        let mut final_chunks = Vec::new();
        if text.is_empty() || separators.is_empty() {
            if !text.trim().is_empty() {
                final_chunks.push(text.trim().to_string());
            }
            return final_chunks;
        }

        // Pick the first separator present in the text; the remaining ones are
        // used for pieces that are still too large.
        let mut separator = &separators[separators.len() - 1];
        let mut remaining: &[Separator] = &[];
        for (idx, candidate) in separators.iter().enumerate() {
            if candidate.literal.is_none() {
                separator = candidate;
                break;
            }
            if candidate.occurs_in(text) {
                separator = candidate;
                remaining = &separators[idx + 1..];
                break;
            }
        }

        let mut small_pieces: Vec<&str> = Vec::new();
        for piece in separator.split(text) {
            if char_len(piece) < self.chunk_size {
                small_pieces.push(piece);
                continue;
            }

            if !small_pieces.is_empty() {
                final_chunks.extend(self.merge_pieces(&small_pieces));
                small_pieces.clear();
            }
            if remaining.is_empty() {
                if !piece.trim().is_empty() {
                    final_chunks.push(piece.trim().to_string());
                }
            } else {
                final_chunks.extend(self.split_recursive(piece, remaining));
            }
        }

        if !small_pieces.is_empty() {
            final_chunks.extend(self.merge_pieces(&small_pieces));
        }

        final_chunks
    }

    /// Greedily concatenates pieces into chunks, keeping up to
    /// `chunk_overlap` characters of each full chunk for the next one.
    fn merge_pieces(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);

            if total + len > self.chunk_size {
                if total > self.chunk_size {
                    tracing::warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total,
                        self.chunk_size
                    );
                }
                if !current.is_empty() {
                    if let Some(chunk) = join_trimmed(&current) {
                        chunks.push(chunk);
                    }
                    while total > self.chunk_overlap
                        || (total + len > self.chunk_size && total > 0)
                    {
                        match current.pop_front() {
                            Some(front) => total -= char_len(front),
                            None => break,
                        }
                    }
                }
            }

            current.push_back(piece);
            total += len;
        }

        if let Some(chunk) = join_trimmed(&current) {
            chunks.push(chunk);
        }

        chunks
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn join_trimmed(pieces: &VecDeque<&str>) -> Option<String> {
    let joined: String = pieces.iter().copied().collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
