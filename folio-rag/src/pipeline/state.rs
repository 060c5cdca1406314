use folio_retriever::storage::Chunk;

/// Position of a query in the pipeline. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    Start,
    Validating,
    Retrieving,
    Generating,
    Done,
}

/// Record threaded through the steps of one query.
///
/// Field writers: validation sets `query` (or `answer_text` on rejection),
/// retrieval sets `retrieved_chunks` and `context_text`, generation sets
/// `answer_text`.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineState {
    /// Trimmed question
    pub query: String,
    /// Index results, best match first
    pub retrieved_chunks: Vec<Chunk>,
    /// Empty means retrieval was not attempted
    pub context_text: String,
    pub answer_text: String,
    pub stage: PipelineStage,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineState {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            retrieved_chunks: Vec::new(),
            context_text: String::new(),
            answer_text: String::new(),
            stage: PipelineStage::Start,
        }
    }

    pub(crate) fn advance(&mut self, next: PipelineStage) {
        debug_assert!(
            next > self.stage,
            "pipeline stage must move forward ({:?} -> {:?})",
            self.stage,
            next
        );
        tracing::debug!("Pipeline stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }
}

/// Input handed to the pipeline before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawQuery {
    Text(String),
    /// A value that is not a string; holds its type name
    Other(String),
    Missing,
}

impl From<&str> for RawQuery {
    fn from(value: &str) -> Self {
        RawQuery::Text(value.to_string())
    }
}

impl From<String> for RawQuery {
    fn from(value: String) -> Self {
        RawQuery::Text(value)
    }
}

impl From<Option<String>> for RawQuery {
    fn from(value: Option<String>) -> Self {
        value.map(RawQuery::Text).unwrap_or(RawQuery::Missing)
    }
}

impl From<&serde_json::Value> for RawQuery {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => RawQuery::Missing,
            Value::String(s) => RawQuery::Text(s.clone()),
            Value::Bool(_) => RawQuery::Other("boolean".to_string()),
            Value::Number(_) => RawQuery::Other("number".to_string()),
            Value::Array(_) => RawQuery::Other("array".to_string()),
            Value::Object(_) => RawQuery::Other("object".to_string()),
        }
    }
}
