//! Model catalog repository trait

use async_trait::async_trait;

use super::Model;
use crate::domain::DomainError;

/// Read-only access to the model catalog
#[async_trait]
pub trait ModelRepository: Send + Sync + std::fmt::Debug {
    /// Get all configured models
    async fn list(&self) -> Result<Vec<Model>, DomainError>;
}

/// In-memory implementation of ModelRepository
pub mod in_memory {
    use super::*;
    use std::sync::RwLock;

    /// In-memory model catalog for development and testing
    #[derive(Debug, Default)]
    pub struct InMemoryModelRepository {
        models: RwLock<Vec<Model>>,
    }

    impl InMemoryModelRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_model(self, model: Model) -> Self {
            if let Ok(mut models) = self.models.write() {
                models.push(model);
            }
            self
        }

        pub fn with_models(self, models: Vec<Model>) -> Self {
            models.into_iter().fold(self, |repo, model| repo.with_model(model))
        }
    }

    #[async_trait]
    impl ModelRepository for InMemoryModelRepository {
        async fn list(&self) -> Result<Vec<Model>, DomainError> {
            self.models
                .read()
                .map(|models| models.clone())
                .map_err(|e| DomainError::internal(format!("Model catalog lock poisoned: {}", e)))
        }
    }
}
