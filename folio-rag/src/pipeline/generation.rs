//! Generation step: prompt rendering plus one chat completion

use crate::error::GenerationError;
use crate::llm::ChatCompletion;
use crate::prompt::render_prompt;
use std::sync::Arc;

#[derive(Debug)]
pub enum GenerationOutcome {
    Answered(String),
    Failed(GenerationError),
}

impl GenerationOutcome {
    /// The text shown to the user.
    pub fn into_answer_text(self) -> String {
        match self {
            GenerationOutcome::Answered(text) => text,
            GenerationOutcome::Failed(err) => format!("Error generating response: {err}"),
        }
    }
}

#[derive(Clone)]
pub struct GenerationStep {
    client: Arc<dyn ChatCompletion>,
}

impl GenerationStep {
    pub fn new(client: Arc<dyn ChatCompletion>) -> Self {
        Self { client }
    }

    /// Never fails; errors become [`GenerationOutcome::Failed`].
    pub async fn generate(&self, query: &str, context: &str) -> GenerationOutcome {
        if context.is_empty() {
            tracing::warn!("No context available, the model will rely on its own knowledge");
        }
        let prompt = render_prompt(context, query);
        tracing::info!(
            "Sending prompt to {} ({} context chars)",
            self.client.model_name(),
            context.chars().count()
        );
        tracing::debug!("Context preview: {}", preview(context, 300));

        match self.client.complete(&prompt).await {
            Ok(text) if text.trim().is_empty() => {
                tracing::error!("Model returned an empty completion");
                GenerationOutcome::Failed(GenerationError::EmptyCompletion)
            }
            Ok(text) => {
                tracing::info!("Response generated ({} chars)", text.chars().count());
                tracing::debug!("Response preview: {}", preview(&text, 200));
                GenerationOutcome::Answered(text)
            }
            Err(err) => {
                tracing::error!("Generation failed: {}", err);
                GenerationOutcome::Failed(err)
            }
        }
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
