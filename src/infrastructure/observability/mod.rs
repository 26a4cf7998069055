//! Observability infrastructure - tracing and metrics

mod config;
mod metrics;
mod tracing_setup;

pub use config::{MetricsConfig, ObservabilityConfig, TracingConfig};
pub use metrics::{
    create_metrics_router, init_metrics, record_http_request, record_llm_attempt,
    record_pipeline_run, record_step, AttemptOutcome, PrometheusMetrics,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
