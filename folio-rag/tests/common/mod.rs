//! Hand-written fakes for the index and the completion service

#![allow(dead_code)]

use async_trait::async_trait;
use folio_rag::GenerationError;
use folio_rag::llm::ChatCompletion;
use folio_retriever::IndexError;
use folio_retriever::retrieval::index::SimilarityIndex;
use folio_retriever::storage::{Chunk, ScoredChunk};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub mod http_stub;

pub enum IndexBehavior {
    Hits(Vec<ScoredChunk>),
    Fail(String),
}

pub struct FakeIndex {
    behavior: IndexBehavior,
    pub calls: AtomicUsize,
    pub last_k: AtomicUsize,
}

impl FakeIndex {
    pub fn with_hits(hits: Vec<ScoredChunk>) -> Self {
        Self {
            behavior: IndexBehavior::Hits(hits),
            calls: AtomicUsize::new(0),
            last_k: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::with_hits(Vec::new())
    }

    pub fn failing(message: &str) -> Self {
        Self {
            behavior: IndexBehavior::Fail(message.to_string()),
            calls: AtomicUsize::new(0),
            last_k: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SimilarityIndex for FakeIndex {
    async fn similarity_search(&self, _query: &str, k: usize) -> Result<Vec<ScoredChunk>, IndexError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_k.store(k, Ordering::SeqCst);
        match &self.behavior {
            IndexBehavior::Hits(hits) => Ok(hits.iter().take(k).cloned().collect()),
            IndexBehavior::Fail(message) => Err(IndexError::Store {
                source: anyhow::anyhow!("{message}"),
            }),
        }
    }
}

pub enum ChatBehavior {
    Reply(String),
    Echo,
    Fail,
}

/// Records every prompt it receives.
pub struct FakeChat {
    behavior: ChatBehavior,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeChat {
    pub fn replying(text: &str) -> Self {
        Self {
            behavior: ChatBehavior::Reply(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Replies with the question line of the prompt.
    pub fn echoing() -> Self {
        Self {
            behavior: ChatBehavior::Echo,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            behavior: ChatBehavior::Fail,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatCompletion for FakeChat {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.behavior {
            ChatBehavior::Reply(text) => Ok(text.clone()),
            ChatBehavior::Echo => Ok(prompt
                .lines()
                .find(|line| line.starts_with("Question: "))
                .unwrap_or_default()
                .to_string()),
            ChatBehavior::Fail => Err(GenerationError::Api {
                status: 503,
                body: "upstream overloaded".to_string(),
            }),
        }
    }

    fn model_name(&self) -> &str {
        "fake/model"
    }
}

pub fn hit(content: &str, source: &str, sequence: usize, score: f32) -> ScoredChunk {
    ScoredChunk {
        chunk: Chunk::new(content, source, sequence),
        score,
    }
}

/// Extracts the context section from a rendered prompt.
pub fn context_of(prompt: &str) -> &str {
    let start = prompt
        .find("Context from Shakespeare's works:\n")
        .map(|i| i + "Context from Shakespeare's works:\n".len())
        .unwrap_or(0);
    let end = prompt.find("\n\nQuestion: ").unwrap_or(prompt.len());
    &prompt[start..end]
}
