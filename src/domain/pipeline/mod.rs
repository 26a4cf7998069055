//! Pipeline domain - ordered LLM steps chained through interpolation

mod candidates;
mod captions;
mod context;
mod error;
mod executor;
mod repository;
mod result;
mod step;

pub use candidates::{CandidateStrategy, CandidateTable, ModelCandidateResolver};
pub use captions::extract_captions;
pub use context::{interpolate, step_output_key, InterpolationContext, IMAGE_CONTEXT_KEY};
pub use error::PipelineError;
pub use executor::{PipelineExecutor, PipelineRequest};
pub use repository::{in_memory::InMemoryStepRepository, StepRepository};
pub use result::{PipelineRun, RunOutcome, StepResult, StepStatus};
pub use step::{FlavorId, InputModality, Step, StepId};

#[cfg(test)]
pub use repository::MockStepRepository;
