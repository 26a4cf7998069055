//! Per-step and per-run results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::captions::extract_captions;
use super::context::InterpolationContext;
use super::step::{FlavorId, Step, StepId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Error,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Outcome of executing one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub step_id: StepId,
    pub order_index: i32,
    pub status: StepStatus,
    /// Model output on success, failure message on error
    pub output: String,
    /// Which model and candidate served the request
    pub model_label: String,
    pub duration_ms: u64,
    /// Caption list when the output is a JSON array of strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captions: Option<Vec<String>>,
}

impl StepResult {
    pub fn success(
        step: &Step,
        output: impl Into<String>,
        model_label: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        let output = output.into();
        let captions = extract_captions(&output);

        Self {
            step_id: step.id,
            order_index: step.order_index,
            status: StepStatus::Success,
            output,
            model_label: model_label.into(),
            duration_ms,
            captions,
        }
    }

    pub fn failure(
        step: &Step,
        message: impl Into<String>,
        model_label: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            step_id: step.id,
            order_index: step.order_index,
            status: StepStatus::Error,
            output: message.into(),
            model_label: model_label.into(),
            duration_ms,
            captions: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Success
    }
}

/// Terminal state of a run that got past loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    /// Every step succeeded
    Succeeded,
    /// A step failed and the remaining steps were skipped
    Halted,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Halted => "halted",
        }
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRun {
    pub run_id: Uuid,
    pub flavor_id: FlavorId,
    pub started_at: DateTime<Utc>,
    /// Prefix of the step sequence; only the last entry may be an error
    pub results: Vec<StepResult>,
    #[serde(skip)]
    pub context: InterpolationContext,
}

impl PipelineRun {
    pub fn new(flavor_id: FlavorId, context: InterpolationContext) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            flavor_id,
            started_at: Utc::now(),
            results: Vec::new(),
            context,
        }
    }

    pub fn outcome(&self) -> RunOutcome {
        match self.results.last() {
            Some(last) if !last.is_success() => RunOutcome::Halted,
            _ => RunOutcome::Succeeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_result_serialization() {
        let step = Step::new(11, 1, 2);
        let result = StepResult::success(&step, r#"["a","b"]"#, "Gemma (google/gemma)", 42);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["stepId"], 11);
        assert_eq!(json["orderIndex"], 2);
        assert_eq!(json["status"], "success");
        assert_eq!(json["modelLabel"], "Gemma (google/gemma)");
        assert_eq!(json["durationMs"], 42);
        assert_eq!(json["captions"][1], "b");
    }

    #[test]
    fn test_failure_result_has_no_captions() {
        let step = Step::new(12, 1, 3);
        let result = StepResult::failure(&step, r#"["looks","like","json"]"#, "Unknown", 5);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "error");
        assert!(json.get("captions").is_none());
    }

    #[test]
    fn test_run_outcome() {
        let step = Step::new(1, 1, 1);
        let mut run = PipelineRun::new(FlavorId::new(1), InterpolationContext::new(None));
        assert_eq!(run.outcome(), RunOutcome::Succeeded);

        run.results.push(StepResult::success(&step, "ok", "m", 1));
        assert_eq!(run.outcome(), RunOutcome::Succeeded);

        run.results.push(StepResult::failure(&step, "boom", "m", 1));
        assert_eq!(run.outcome(), RunOutcome::Halted);
    }

    #[test]
    fn test_run_serialization_skips_context() {
        let run = PipelineRun::new(FlavorId::new(9), InterpolationContext::new(Some("ctx")));
        let json = serde_json::to_value(&run).unwrap();

        assert_eq!(json["flavorId"], 9);
        assert!(json.get("context").is_none());
        assert!(json["results"].as_array().unwrap().is_empty());
    }
}
