//! Step repository trait

use async_trait::async_trait;

use super::{FlavorId, Step};
use crate::domain::DomainError;

/// Read-only access to pipeline step configuration
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StepRepository: Send + Sync + std::fmt::Debug {
    /// Steps of one pipeline, ordered by order index ascending
    async fn list_for_flavor(&self, flavor_id: FlavorId) -> Result<Vec<Step>, DomainError>;

    /// Whether the backing store is reachable
    async fn health_check(&self) -> Result<bool, DomainError>;
}

/// In-memory implementation of StepRepository
pub mod in_memory {
    use super::*;
    use std::sync::RwLock;

    #[derive(Debug, Default)]
    pub struct InMemoryStepRepository {
        steps: RwLock<Vec<Step>>,
    }

    impl InMemoryStepRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_step(self, step: Step) -> Self {
            if let Ok(mut steps) = self.steps.write() {
                steps.push(step);
            }
            self
        }

        pub fn with_steps(self, steps: Vec<Step>) -> Self {
            steps.into_iter().fold(self, |repo, step| repo.with_step(step))
        }
    }

    #[async_trait]
    impl StepRepository for InMemoryStepRepository {
        async fn list_for_flavor(&self, flavor_id: FlavorId) -> Result<Vec<Step>, DomainError> {
            let steps = self
                .steps
                .read()
                .map_err(|e| DomainError::internal(format!("Step store lock poisoned: {}", e)))?;

            let mut matching: Vec<Step> = steps
                .iter()
                .filter(|s| s.flavor_id == flavor_id)
                .cloned()
                .collect();
            matching.sort_by_key(|s| s.order_index);

            Ok(matching)
        }

        async fn health_check(&self) -> Result<bool, DomainError> {
            Ok(true)
        }
    }
}
