use serde::{Deserialize, Serialize};

/// Normalized completion output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    /// First completion's text; empty when the provider returned an unexpected shape
    pub content: String,
    /// Candidate model identifier that served the request
    pub model: String,
}

impl LlmResponse {
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
        }
    }
}
