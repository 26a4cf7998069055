//! Completion call failures

use thiserror::Error;

/// Errors raised by a single completion attempt against one candidate model
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompletionError {
    /// 429 from the provider; the next candidate may still serve the request
    #[error("Model '{model}' is rate limited: {body}")]
    RateLimited { model: String, body: String },

    /// 404 from the provider; the model is retired or unknown
    #[error("Model '{model}' is unavailable: {body}")]
    ModelUnavailable { model: String, body: String },

    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{variable} not configured")]
    MissingCredential { variable: String },

    #[error("{provider} request failed: {message}")]
    Transport { provider: String, message: String },
}

impl CompletionError {
    pub fn missing_credential(variable: impl Into<String>) -> Self {
        Self::MissingCredential {
            variable: variable.into(),
        }
    }

    pub fn transport(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether the fallback loop may move on to the next candidate
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::ModelUnavailable { .. })
    }

    /// Raw provider body for recoverable errors, display text otherwise
    pub fn detail(&self) -> String {
        match self {
            Self::RateLimited { body, .. } | Self::ModelUnavailable { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }

    /// Map a non-2xx HTTP status onto the completion error taxonomy
    pub fn from_status(provider: &str, model: &str, status: u16, body: String) -> Self {
        match status {
            429 => Self::RateLimited {
                model: model.to_string(),
                body,
            },
            404 => Self::ModelUnavailable {
                model: model.to_string(),
                body,
            },
            _ => Self::Api {
                provider: provider.to_string(),
                status,
                body,
            },
        }
    }
}
