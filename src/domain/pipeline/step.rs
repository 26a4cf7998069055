//! Step configuration entity

use serde::{Deserialize, Serialize};

use crate::domain::model::ModelId;

/// Identifier of a pipeline (one humor flavor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlavorId(i64);

impl FlavorId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for FlavorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a configured step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(i64);

impl StepId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether the step's request carries the uploaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputModality {
    #[default]
    TextOnly,
    ImageAndText,
}

impl InputModality {
    /// Catalog input type id 1 is image-and-text; anything else is text only
    pub fn from_type_id(type_id: Option<i64>) -> Self {
        match type_id {
            Some(1) => Self::ImageAndText,
            _ => Self::TextOnly,
        }
    }

    pub fn needs_image(&self) -> bool {
        matches!(self, Self::ImageAndText)
    }
}

/// One configured LLM invocation of a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub flavor_id: FlavorId,
    /// Execution position, unique within the pipeline
    pub order_index: i32,
    #[serde(default)]
    pub input_modality: InputModality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_ref: Option<ModelId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_prompt_template: Option<String>,
    /// Display-only classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_type_ref: Option<i64>,
}

impl Step {
    pub fn new(id: i64, flavor_id: i64, order_index: i32) -> Self {
        Self {
            id: StepId::new(id),
            flavor_id: FlavorId::new(flavor_id),
            order_index,
            input_modality: InputModality::TextOnly,
            model_ref: None,
            temperature: None,
            system_prompt_template: None,
            user_prompt_template: None,
            step_type_ref: None,
        }
    }

    pub fn with_modality(mut self, modality: InputModality) -> Self {
        self.input_modality = modality;
        self
    }

    pub fn with_model(mut self, model_id: impl Into<ModelId>) -> Self {
        self.model_ref = Some(model_id.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_system_prompt(mut self, template: impl Into<String>) -> Self {
        self.system_prompt_template = Some(template.into());
        self
    }

    pub fn with_user_prompt(mut self, template: impl Into<String>) -> Self {
        self.user_prompt_template = Some(template.into());
        self
    }

    pub fn with_step_type(mut self, step_type: i64) -> Self {
        self.step_type_ref = Some(step_type);
        self
    }

    pub fn system_prompt(&self) -> &str {
        self.system_prompt_template.as_deref().unwrap_or_default()
    }

    pub fn user_prompt(&self) -> &str {
        self.user_prompt_template.as_deref().unwrap_or_default()
    }

    pub fn needs_image(&self) -> bool {
        self.input_modality.needs_image()
    }
}
