//! Domain layer - Core business logic and entities

pub mod auth;
pub mod error;
pub mod llm;
pub mod model;
pub mod pipeline;

pub use auth::{AccessCheck, Profile, ProfileRepository, Session, SessionAuthorizer};
pub use error::DomainError;
pub use llm::{
    CompletionError, ContentPart, ImageInput, LlmProvider, LlmRequest, LlmRequestBuilder,
    LlmResponse, Message, MessageRole,
};
pub use model::{InMemoryModelRepository, Model, ModelId, ModelRepository};
pub use pipeline::{
    CandidateStrategy, CandidateTable, FlavorId, InputModality, InterpolationContext,
    ModelCandidateResolver, PipelineError, PipelineExecutor, PipelineRequest, PipelineRun,
    RunOutcome, Step, StepId, StepRepository, StepResult, StepStatus,
};
