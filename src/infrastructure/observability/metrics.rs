//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;
use crate::domain::{RunOutcome, StepStatus};

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl std::fmt::Debug for PrometheusMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusMetrics").finish_non_exhaustive()
    }
}

impl PrometheusMetrics {
    /// Render the scrape payload
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Install the global Prometheus recorder
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("humor_pipeline_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!(path = %config.path, "Prometheus metrics initialized");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize Prometheus metrics");
            None
        }
    }
}

/// Router serving the scrape endpoint at `path`
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Record the terminal state of a run that got past loading
pub fn record_pipeline_run(outcome: RunOutcome) {
    counter!("pipeline_runs_total", "outcome" => outcome.as_str()).increment(1);
}

/// Record one executed step
pub fn record_step(status: StepStatus, duration: Duration) {
    histogram!("pipeline_step_duration_seconds", "status" => status.as_str())
        .record(duration.as_secs_f64());
}

/// Outcome label of one completion attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    /// Rate limited or unavailable; the next candidate was tried
    Fallback,
    Failed,
}

impl AttemptOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Fallback => "fallback",
            Self::Failed => "failed",
        }
    }
}

/// Record one completion attempt against one candidate
pub fn record_llm_attempt(provider: &str, model: &str, outcome: AttemptOutcome) {
    let labels = [
        ("provider", provider.to_string()),
        ("model", model.to_string()),
        ("outcome", outcome.as_str().to_string()),
    ];

    counter!("pipeline_llm_attempts_total", &labels).increment(1);
}

/// Collapse numeric and UUID path segments to keep label cardinality bounded
fn sanitize_path(path: &str) -> String {
    let sanitized = path
        .split('/')
        .map(|segment| {
            let is_id = (!segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()))
                || uuid::Uuid::parse_str(segment).is_ok();

            if is_id { "{id}" } else { segment }
        })
        .collect::<Vec<_>>()
        .join("/");

    sanitized.chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_uuid() {
        let path = "/api/runs/550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(sanitize_path(path), "/api/runs/{id}");
    }

    #[test]
    fn test_sanitize_path_numeric_id() {
        assert_eq!(sanitize_path("/api/pipeline/12/steps"), "/api/pipeline/{id}/steps");
    }

    #[test]
    fn test_sanitize_path_no_id() {
        assert_eq!(sanitize_path("/health"), "/health");
        assert_eq!(sanitize_path("/"), "/");
    }

    #[test]
    fn test_sanitize_path_truncates_long_paths() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        assert!(sanitize_path(path).len() <= 50);
    }

    #[test]
    fn test_attempt_outcome_labels() {
        assert_eq!(AttemptOutcome::Success.as_str(), "success");
        assert_eq!(AttemptOutcome::Fallback.as_str(), "fallback");
        assert_eq!(AttemptOutcome::Failed.as_str(), "failed");
    }
}
