//! Infrastructure layer - External service implementations

pub mod auth;
pub mod llm;
pub mod observability;
pub mod pipeline;
