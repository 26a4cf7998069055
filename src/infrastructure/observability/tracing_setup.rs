//! Log subscriber and OpenTelemetry export setup

use opentelemetry::{trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use super::config::TracingConfig;
use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber; `RUST_LOG` overrides the configured level
pub fn init_tracing(logging_config: &LoggingConfig, tracing_config: &TracingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging_config.level));

    match logging_config.format {
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(true)
                .with_file(true)
                .with_line_number(true);

            install(filter, fmt_layer, tracing_config);
        }
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE);

            install(filter, fmt_layer, tracing_config);
        }
    }
}

fn install<L>(filter: EnvFilter, fmt_layer: L, tracing_config: &TracingConfig)
where
    L: Layer<Layered<EnvFilter, Registry>> + Send + Sync + 'static,
{
    let provider = if tracing_config.enabled {
        match init_otel_tracing(tracing_config) {
            Ok(provider) => Some(provider),
            Err(e) => {
                eprintln!("Failed to initialize OpenTelemetry: {}. Span export disabled.", e);
                None
            }
        }
    } else {
        None
    };

    let telemetry_layer = provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(tracing_config.service_name.clone()))
    });
    let exporting = provider.is_some();

    if let Some(provider) = provider {
        opentelemetry::global::set_tracer_provider(provider);
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(telemetry_layer)
        .init();

    if exporting {
        tracing::info!(endpoint = %tracing_config.otlp_endpoint, "Tracing initialized with OpenTelemetry export");
    } else {
        tracing::info!("Tracing initialized (OpenTelemetry disabled)");
    }
}

fn init_otel_tracing(
    config: &TracingConfig,
) -> Result<TracerProvider, opentelemetry::trace::TraceError> {
    let resource = Resource::new(vec![KeyValue::new(
        "service.name",
        config.service_name.clone(),
    )]);

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.otlp_endpoint)
        .build()?;

    let provider = TracerProvider::builder()
        .with_sampler(sampler_for(config.sampling_ratio))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .with_batch_exporter(exporter, runtime::Tokio)
        .build();

    Ok(provider)
}

fn sampler_for(ratio: f64) -> Sampler {
    if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    }
}

/// Flush pending spans
pub fn shutdown_tracing() {
    opentelemetry::global::shutdown_tracer_provider();
    tracing::info!("Tracing shutdown complete");
}
