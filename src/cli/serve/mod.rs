//! Serve command - runs the pipeline API

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::api::create_router_with_state;
use crate::config::AppConfig;
use crate::infrastructure::observability::{
    create_metrics_router, init_metrics, init_tracing, shutdown_tracing,
};

/// Run the API server until a shutdown signal arrives
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.logging, &config.observability.tracing);
    config.validate()?;

    let state = crate::create_app_state(&config).await?;
    let app = create_app(&config, state);

    let addr = build_socket_addr(&config)?;
    info!("Starting pipeline API on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tracing();
    info!("Pipeline API shutdown complete");

    Ok(())
}

fn create_app(config: &AppConfig, state: crate::api::AppState) -> Router {
    let mut router = create_router_with_state(state, &config.server);

    if let Some(metrics) = init_metrics(&config.observability.metrics) {
        router = router.merge(create_metrics_router(
            metrics,
            &config.observability.metrics.path,
        ));
    }

    router
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}
