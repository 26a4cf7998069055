//! LLM provider domain models and traits

mod error;
mod message;
mod provider;
mod request;
mod response;

pub use error::CompletionError;
pub use message::{ContentPart, ImageInput, Message, MessageRole};
pub use provider::LlmProvider;
pub use request::{LlmRequest, LlmRequestBuilder};
pub use response::LlmResponse;

#[cfg(test)]
pub use provider::mock::MockLlmProvider;
