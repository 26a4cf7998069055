//! Observability configuration

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub tracing: TracingConfig,
    pub metrics: MetricsConfig,
}

/// OTLP span export
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub enabled: bool,
    /// gRPC collector, e.g. http://localhost:4317
    pub otlp_endpoint: String,
    pub service_name: String,
    /// Fraction of pipeline runs sampled, 0.0 to 1.0
    pub sampling_ratio: f64,
}

/// Prometheus scrape endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: "http://localhost:4317".to_string(),
            service_name: "humor-pipeline".to_string(),
            sampling_ratio: 1.0,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}
