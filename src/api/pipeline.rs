//! Pipeline endpoints

use axum::extract::{Path, State};
use tracing::info;

use super::middleware::CallerSession;
use super::state::AppState;
use super::types::{
    ApiError, Json, RunPipelineRequest, RunPipelineResponse, StepListResponse, StepSummary,
};
use crate::domain::{FlavorId, PipelineRequest};

/// `POST /api/pipeline`: run every step of a flavor against the uploaded image.
///
/// A run that stops at a failing step is still a 200; the failure is the
/// last entry of `results`.
pub async fn run_pipeline(
    State(state): State<AppState>,
    CallerSession(session): CallerSession,
    Json(body): Json<RunPipelineRequest>,
) -> Result<Json<RunPipelineResponse>, ApiError> {
    let request = PipelineRequest::from(body);

    info!(
        flavor_id = ?request.flavor_id.map(|id| id.value()),
        has_image = request.image.is_some(),
        "Pipeline run requested"
    );

    let run = state.executor.execute(&session, request).await?;

    Ok(Json(RunPipelineResponse::from(run)))
}

/// `GET /api/pipeline/{flavor_id}/steps`: ordered step summaries of a flavor
pub async fn list_steps(
    State(state): State<AppState>,
    CallerSession(session): CallerSession,
    Path(flavor_id): Path<String>,
) -> Result<Json<StepListResponse>, ApiError> {
    // Unparseable ids are reported after authorization, like a missing id
    let flavor_id = flavor_id.parse::<i64>().ok().map(FlavorId::new);

    let steps = state.executor.describe(&session, flavor_id).await?;

    Ok(Json(StepListResponse {
        steps: steps.iter().map(StepSummary::from).collect(),
    }))
}
