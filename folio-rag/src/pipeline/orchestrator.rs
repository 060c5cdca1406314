use super::generation::GenerationStep;
use super::retrieval::RetrievalStep;
use super::state::{PipelineStage, PipelineState, RawQuery};
use super::validation::validate_query;
use crate::llm::ChatCompletion;
use folio_retriever::retrieval::index::SimilarityIndex;
use std::sync::Arc;

/// Runs validation, retrieval and generation for one query at a time.
///
/// Cheap to clone; clones share the index and the completion client, so
/// several queries can be answered concurrently on separate tasks.
#[derive(Clone)]
pub struct Orchestrator {
    retrieval: RetrievalStep,
    generation: GenerationStep,
}

impl Orchestrator {
    pub fn new(index: Arc<dyn SimilarityIndex>, client: Arc<dyn ChatCompletion>) -> Self {
        Self {
            retrieval: RetrievalStep::new(index),
            generation: GenerationStep::new(client),
        }
    }

    /// Answers `raw`, returning the final text: the model's answer or a sentinel.
    pub async fn answer(&self, raw: impl Into<RawQuery>) -> String {
        self.run(raw).await.answer_text
    }

    /// Same as [`Orchestrator::answer`], returning the whole final state.
    pub async fn run(&self, raw: impl Into<RawQuery>) -> PipelineState {
        let raw = raw.into();
        let mut state = PipelineState::new();

        state.advance(PipelineStage::Validating);
        match validate_query(&raw) {
            Ok(query) => {
                tracing::info!("Query validated: '{}' ({} chars)", query, query.chars().count());
                state.query = query;
            }
            Err(rejection) => {
                tracing::error!("Query rejected: {}", rejection);
                state.answer_text = rejection.to_string();
                state.advance(PipelineStage::Done);
                return state;
            }
        }

        state.advance(PipelineStage::Retrieving);
        let (chunks, context) = self.retrieval.retrieve(&state.query).await.into_parts();
        state.retrieved_chunks = chunks;
        state.context_text = context;

        state.advance(PipelineStage::Generating);
        state.answer_text = self
            .generation
            .generate(&state.query, &state.context_text)
            .await
            .into_answer_text();

        state.advance(PipelineStage::Done);
        state
    }
}
