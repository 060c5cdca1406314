//! # folio-context
//!
//! Text preparation for the folio corpus: recursive character splitting of
//! plays into overlapping chunks and derivation of work titles from corpus
//! file names.
//!
//! ```
//! use folio_context::{TextSplitter, work_title};
//! use std::path::Path;
//!
//! let path = Path::new("data/macbeth_TXT_FolgerShakespeare.txt");
//! let splitter = TextSplitter::default();
//! let chunks = splitter.chunk_document(
//!     &work_title(path),
//!     &path.to_string_lossy(),
//!     "Fair is foul, and foul is fair.\n\nHover through the fog and filthy air.",
//! );
//!
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].source, "Macbeth");
//! ```
pub mod text;
pub mod title;

pub use text::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_SEPARATORS, TextChunk, TextSplitter,
};
pub use title::{FOLGER_SUFFIX, title_case, work_title};
