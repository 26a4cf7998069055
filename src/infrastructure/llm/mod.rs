//! LLM provider implementations

mod factory;
mod gemini;
mod http_client;
mod openai_compatible;

pub use factory::LlmProviderFactory;
pub use gemini::GeminiProvider;
pub use http_client::{HttpClient, HttpClientTrait, HttpResponse};
pub use openai_compatible::OpenAiCompatibleProvider;
