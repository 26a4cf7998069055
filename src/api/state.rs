//! Application state for shared services

use std::sync::Arc;

use crate::domain::{PipelineExecutor, StepRepository};

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<dyn PipelineExecutor>,
    /// Probed by the readiness endpoint
    pub steps: Arc<dyn StepRepository>,
}

impl AppState {
    pub fn new(executor: Arc<dyn PipelineExecutor>, steps: Arc<dyn StepRepository>) -> Self {
        Self { executor, steps }
    }
}
