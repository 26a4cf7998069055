//! In-memory catalog seeded from a TOML file
//!
//! ```toml
//! [[models]]
//! id = 1
//! display_name = "Gemma 27B"
//! provider_model_id = "google/gemma-3-27b-it:free"
//!
//! [[steps]]
//! id = 10
//! flavor_id = 1
//! order_index = 1
//! input_modality = "imageAndText"
//! model_ref = 1
//! user_prompt_template = "Describe the image. ${imageAdditionalContext}"
//!
//! [[profiles]]
//! id = "7f8c..."
//! is_superadmin = true
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::domain::auth::InMemoryProfileRepository;
use crate::domain::pipeline::InMemoryStepRepository;
use crate::domain::{InMemoryModelRepository, Model, Profile, Step};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse seed TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid seed: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
struct SeedModel {
    id: i64,
    display_name: String,
    provider_model_id: String,
    #[serde(default)]
    provider_id: i64,
    #[serde(default = "default_true")]
    supports_temperature: bool,
}

fn default_true() -> bool {
    true
}

impl From<SeedModel> for Model {
    fn from(seed: SeedModel) -> Self {
        Model::new(seed.id, seed.display_name, seed.provider_model_id)
            .with_provider_id(seed.provider_id)
            .with_supports_temperature(seed.supports_temperature)
    }
}

/// Catalog contents as written in the seed file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    models: Vec<SeedModel>,
    #[serde(default)]
    steps: Vec<Step>,
    #[serde(default)]
    profiles: Vec<Profile>,
}

/// Repositories backed by a loaded seed
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    pub steps: Arc<InMemoryStepRepository>,
    pub models: Arc<InMemoryModelRepository>,
    pub profiles: Arc<InMemoryProfileRepository>,
}

impl CatalogSeed {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading catalog seed");

        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, SeedError> {
        let seed: CatalogSeed = toml::from_str(content)?;
        seed.validate()?;
        Ok(seed)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Order indexes must be unique within a flavor; ids unique across the catalog
    fn validate(&self) -> Result<(), SeedError> {
        let mut positions = HashSet::new();
        let mut step_ids = HashSet::new();

        for step in &self.steps {
            if !step_ids.insert(step.id) {
                return Err(SeedError::Invalid(format!("duplicate step id {}", step.id)));
            }

            if !positions.insert((step.flavor_id, step.order_index)) {
                return Err(SeedError::Invalid(format!(
                    "flavor {} has more than one step at order index {}",
                    step.flavor_id, step.order_index
                )));
            }
        }

        let mut model_ids = HashSet::new();
        for model in &self.models {
            if !model_ids.insert(model.id) {
                return Err(SeedError::Invalid(format!("duplicate model id {}", model.id)));
            }
        }

        Ok(())
    }

    pub fn into_catalog(self) -> InMemoryCatalog {
        let models = self.models.into_iter().map(Model::from).collect();
        let profiles = self
            .profiles
            .into_iter()
            .fold(InMemoryProfileRepository::new(), |repo, profile| {
                repo.with_profile(profile)
            });

        InMemoryCatalog {
            steps: Arc::new(InMemoryStepRepository::new().with_steps(self.steps)),
            models: Arc::new(InMemoryModelRepository::new().with_models(models)),
            profiles: Arc::new(profiles),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FlavorId, InputModality, ModelRepository, ProfileRepository, StepRepository};

    const SEED: &str = r#"
        [[models]]
        id = 1
        display_name = "Gemma 27B"
        provider_model_id = "google/gemma-3-27b-it:free"

        [[models]]
        id = 2
        display_name = "R1"
        provider_model_id = "deepseek/deepseek-r1-0528:free"
        supports_temperature = false

        [[steps]]
        id = 11
        flavor_id = 1
        order_index = 2
        model_ref = 2
        temperature = 0.8
        user_prompt_template = "Write captions for: ${step1Output}"

        [[steps]]
        id = 10
        flavor_id = 1
        order_index = 1
        input_modality = "imageAndText"
        model_ref = 1
        system_prompt_template = "You describe images."
        user_prompt_template = "Describe. ${imageAdditionalContext}"

        [[profiles]]
        id = "admin-1"
        is_superadmin = true
    "#;

    #[tokio::test]
    async fn test_seed_populates_repositories() {
        let seed = CatalogSeed::from_toml(SEED).unwrap();
        assert_eq!(seed.step_count(), 2);
        assert_eq!(seed.model_count(), 2);

        let catalog = seed.into_catalog();

        let steps = catalog.steps.list_for_flavor(FlavorId::new(1)).await.unwrap();
        assert_eq!(steps[0].id.value(), 10);
        assert_eq!(steps[0].input_modality, InputModality::ImageAndText);
        assert_eq!(steps[1].temperature, Some(0.8));

        let models = catalog.models.list().await.unwrap();
        assert!(models.iter().any(|m| !m.supports_temperature()));

        let profile = catalog.profiles.get("admin-1").await.unwrap().unwrap();
        assert!(profile.is_superadmin);
    }

    #[test]
    fn test_empty_seed_is_valid() {
        let seed = CatalogSeed::from_toml("").unwrap();
        assert_eq!(seed.step_count(), 0);
    }

    #[test]
    fn test_duplicate_order_index_rejected() {
        let content = r#"
            [[steps]]
            id = 1
            flavor_id = 3
            order_index = 1

            [[steps]]
            id = 2
            flavor_id = 3
            order_index = 1
        "#;

        let err = CatalogSeed::from_toml(content).unwrap_err();
        assert!(matches!(err, SeedError::Invalid(_)));
    }

    #[test]
    fn test_same_order_index_in_different_flavors_allowed() {
        let content = r#"
            [[steps]]
            id = 1
            flavor_id = 3
            order_index = 1

            [[steps]]
            id = 2
            flavor_id = 4
            order_index = 1
        "#;

        assert!(CatalogSeed::from_toml(content).is_ok());
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = CatalogSeed::from_toml("[[steps]\nid = ").unwrap_err();
        assert!(matches!(err, SeedError::Toml(_)));
    }
}
