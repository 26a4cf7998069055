//! Model entity and related types

use serde::{Deserialize, Serialize};

/// Catalog identifier of a configured model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(i64);

impl ModelId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ModelId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A model as configured in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    id: ModelId,

    /// Human-readable name shown in run reports
    display_name: String,

    /// The provider API's model name
    provider_model_id: String,

    provider_id: i64,

    /// When false, step temperatures are dropped instead of sent
    supports_temperature: bool,
}

impl Model {
    pub fn new(
        id: impl Into<ModelId>,
        display_name: impl Into<String>,
        provider_model_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            provider_model_id: provider_model_id.into(),
            provider_id: 0,
            supports_temperature: true,
        }
    }

    pub fn with_provider_id(mut self, provider_id: i64) -> Self {
        self.provider_id = provider_id;
        self
    }

    pub fn with_supports_temperature(mut self, supported: bool) -> Self {
        self.supports_temperature = supported;
        self
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn provider_model_id(&self) -> &str {
        &self.provider_model_id
    }

    pub fn provider_id(&self) -> i64 {
        self.provider_id
    }

    pub fn supports_temperature(&self) -> bool {
        self.supports_temperature
    }

    /// The temperature to send for a step using this model
    pub fn effective_temperature(&self, configured: Option<f32>) -> Option<f32> {
        if self.supports_temperature {
            configured
        } else {
            None
        }
    }
}
