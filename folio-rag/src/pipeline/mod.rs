//! The per-query answer pipeline
//!
//! ```text
//! START → VALIDATING → RETRIEVING → GENERATING → DONE
//! ```
//!
//! Each step handles its own failures. A rejected query jumps straight to
//! DONE with a validation message; a failed search still leads to generation,
//! with an error description as context; a failed completion becomes the
//! final answer text.

pub mod generation;
pub mod orchestrator;
pub mod retrieval;
pub mod state;
pub mod validation;

pub use generation::{GenerationOutcome, GenerationStep};
pub use orchestrator::Orchestrator;
pub use retrieval::{RetrievalOutcome, RetrievalStep, format_context};
pub use state::{PipelineStage, PipelineState, RawQuery};
pub use validation::{ValidationError, validate_query};
