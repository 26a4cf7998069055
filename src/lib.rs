//! Humor Pipeline
//!
//! Runs humor flavor pipelines for the caption admin console: an ordered
//! list of prompt steps that turns an uploaded image into captions, with
//! each step's output available to the prompts of the steps after it.
//! Supports:
//! - Session-token authorization restricted to superadmins
//! - Per-step model fallback across a candidate preference table
//! - OpenRouter, OpenAI and Gemini providers
//! - PostgreSQL or TOML-seeded in-memory step catalogs

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::{info, warn};

use api::state::AppState;
use config::{StorageBackend, StorageConfig};
use domain::{ModelRepository, ProfileRepository, StepRepository};
use infrastructure::{
    auth::{JwtConfig, JwtSessionAuthorizer, JwtValidator},
    llm::LlmProviderFactory,
    pipeline::{connect, CatalogSeed, DefaultModel, PipelineEngine, PostgresCatalog},
};

/// Catalog repositories shared by the engine and the authorizer
struct Repositories {
    steps: Arc<dyn StepRepository>,
    models: Arc<dyn ModelRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

/// Create application state from configuration
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let repositories = create_repositories(&config.storage).await?;

    let validator = config.auth.jwt_secret.as_deref().map(|secret| {
        JwtValidator::new(&JwtConfig::new(secret, config.auth.jwt_audience.clone()))
    });
    if validator.is_none() {
        warn!("auth.jwt_secret not set; every request will be rejected as unauthenticated");
    }
    let authorizer = Arc::new(JwtSessionAuthorizer::new(validator, repositories.profiles));

    let provider = LlmProviderFactory::create(&config.llm)?;

    let engine = PipelineEngine::new(
        authorizer,
        repositories.steps.clone(),
        repositories.models,
        provider,
    )
    .with_resolver(config.llm.candidate_resolver()?)
    .with_default_model(DefaultModel {
        provider_model_id: config.llm.default_model.provider_model_id.clone(),
        label: config.llm.default_model.label.clone(),
    });

    Ok(AppState::new(Arc::new(engine), repositories.steps))
}

async fn create_repositories(storage: &StorageConfig) -> anyhow::Result<Repositories> {
    match storage.backend {
        StorageBackend::Memory => {
            let seed = match &storage.seed_file {
                Some(path) => CatalogSeed::from_file(path)?,
                None => {
                    warn!("No seed file configured; the in-memory catalog is empty");
                    CatalogSeed::default()
                }
            };

            info!(
                steps = seed.step_count(),
                models = seed.model_count(),
                "Using in-memory catalog"
            );

            let catalog = seed.into_catalog();
            Ok(Repositories {
                steps: catalog.steps,
                models: catalog.models,
                profiles: catalog.profiles,
            })
        }
        StorageBackend::Postgres => {
            let url = storage.database_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("storage.database_url is required for the postgres backend")
            })?;

            info!("Using PostgreSQL catalog");
            let catalog = Arc::new(PostgresCatalog::new(connect(url, storage.max_connections).await?));

            Ok(Repositories {
                steps: catalog.clone(),
                models: catalog.clone(),
                profiles: catalog,
            })
        }
    }
}
