use crate::error::{IndexError, Result};
use folio_context::{TextChunk, TextSplitter, work_title};
use std::path::{Path, PathBuf};

/// Default location of the plain-text play collection.
pub const DEFAULT_CORPUS_DIR: &str = "data/folger-shakespeares";

/// One play read from disk.
#[derive(Debug, Clone)]
pub struct CorpusDocument {
    pub path: PathBuf,
    pub title: String,
    pub content: String,
}

/// All `*.txt` documents directly under a directory, in sorted path order.
#[derive(Debug, Clone)]
pub struct Corpus {
    dir: PathBuf,
    documents: Vec<CorpusDocument>,
}

impl Corpus {
    /// Reads every `*.txt` file in `dir`. Subdirectories are not descended into.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let entries = std::fs::read_dir(&dir).map_err(|source| IndexError::CorpusRead {
            path: dir.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| IndexError::CorpusRead {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            let is_text = path.extension().is_some_and(|ext| ext == "txt");
            if is_text && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(IndexError::EmptyCorpus { dir });
        }

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let content = std::fs::read_to_string(&path).map_err(|source| {
                IndexError::CorpusRead {
                    path: path.clone(),
                    source,
                }
            })?;
            let title = work_title(&path);
            tracing::debug!("Loaded '{}' ({} chars)", title, content.chars().count());
            documents.push(CorpusDocument {
                path,
                title,
                content,
            });
        }

        tracing::info!("Loaded {} documents from {}", documents.len(), dir.display());
        Ok(Self { dir, documents })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn documents(&self) -> &[CorpusDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Splits every document, in corpus order.
    pub fn chunks(&self, splitter: &TextSplitter) -> Vec<TextChunk> {
        self.documents
            .iter()
            .flat_map(|doc| {
                splitter.chunk_document(&doc.title, &doc.path.to_string_lossy(), &doc.content)
            })
            .collect()
    }
}
