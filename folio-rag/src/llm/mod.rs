//! Chat-completion clients
//!
//! The pipeline only depends on [`ChatCompletion`]; [`openai::OpenAiChatClient`]
//! is the implementation used by the binary.

use crate::error::GenerationError;
use async_trait::async_trait;

pub mod openai;

/// A hosted language model that turns a prompt into text.
///
/// Implementations are built once and shared between concurrent queries, so
/// they must not keep per-request mutable state.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Sends `prompt` as a single user message and returns the reply text.
    /// Transient failures are retried inside the implementation.
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;

    fn model_name(&self) -> &str;
}
