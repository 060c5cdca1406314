//! Corpus loading, collection building and similarity search
//!
//! - [`corpus`]: reads the play collection from disk
//! - [`indexer`]: startup policy deciding whether the corpus gets uploaded
//! - [`index`]: the [`index::SimilarityIndex`] seam used by the answer pipeline

pub mod corpus;
pub mod index;
pub mod indexer;
