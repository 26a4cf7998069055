//! HTTP request and response types

pub mod error;
pub mod json;
pub mod pipeline;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use pipeline::{RunPipelineRequest, RunPipelineResponse, StepListResponse, StepSummary};
