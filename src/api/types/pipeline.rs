//! Pipeline endpoint request and response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    FlavorId, ImageInput, InputModality, ModelId, PipelineRequest, PipelineRun, Step, StepId,
    StepResult,
};

/// Body of `POST /api/pipeline`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPipelineRequest {
    #[serde(default)]
    pub flavor_id: Option<i64>,
    /// Base64 image bytes, without a data URI prefix
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub image_mime: Option<String>,
    #[serde(default)]
    pub image_additional_context: Option<String>,
}

impl From<RunPipelineRequest> for PipelineRequest {
    fn from(body: RunPipelineRequest) -> Self {
        PipelineRequest {
            flavor_id: body.flavor_id.map(FlavorId::new),
            image: ImageInput::from_parts(body.image_base64.as_deref(), body.image_mime.as_deref()),
            image_additional_context: body.image_additional_context,
        }
    }
}

/// Body returned once a run completes, fully or up to its failing step
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPipelineResponse {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub results: Vec<StepResult>,
}

impl From<PipelineRun> for RunPipelineResponse {
    fn from(run: PipelineRun) -> Self {
        Self {
            run_id: run.run_id,
            started_at: run.started_at,
            results: run.results,
        }
    }
}

/// One entry of `GET /api/pipeline/{flavor_id}/steps`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSummary {
    pub id: StepId,
    pub order_index: i32,
    pub input_modality: InputModality,
    pub model_ref: Option<ModelId>,
    pub step_type_ref: Option<i64>,
}

impl From<&Step> for StepSummary {
    fn from(step: &Step) -> Self {
        Self {
            id: step.id,
            order_index: step.order_index,
            input_modality: step.input_modality,
            model_ref: step.model_ref,
            step_type_ref: step.step_type_ref,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepListResponse {
    pub steps: Vec<StepSummary>,
}
