//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, CandidateStrategyKind, CandidatesConfig, DefaultModelConfig,
    LlmConfig, LogFormat, LoggingConfig, ProviderKind, ServerConfig, StorageBackend,
    StorageConfig,
};
