//! Pipeline executor trait and request type

use async_trait::async_trait;

use super::error::PipelineError;
use super::result::PipelineRun;
use super::step::{FlavorId, Step};
use crate::domain::auth::Session;
use crate::domain::llm::ImageInput;

/// Input of one pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineRequest {
    pub flavor_id: Option<FlavorId>,
    /// Attached to image-and-text steps only
    pub image: Option<ImageInput>,
    pub image_additional_context: Option<String>,
}

impl PipelineRequest {
    pub fn new(flavor_id: FlavorId) -> Self {
        Self {
            flavor_id: Some(flavor_id),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, image: ImageInput) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_image_context(mut self, context: impl Into<String>) -> Self {
        self.image_additional_context = Some(context.into());
        self
    }
}

/// Runs configured pipelines on behalf of a caller
#[async_trait]
pub trait PipelineExecutor: Send + Sync + std::fmt::Debug {
    /// Authorize, load and run every step in order, halting at the first
    /// failing step. Whole-request failures come back as `Err`; step
    /// failures come back inside the run.
    async fn execute(
        &self,
        session: &Session,
        request: PipelineRequest,
    ) -> Result<PipelineRun, PipelineError>;

    /// Authorize and return the ordered steps of a pipeline
    async fn describe(
        &self,
        session: &Session,
        flavor_id: Option<FlavorId>,
    ) -> Result<Vec<Step>, PipelineError>;
}
