use serde::Deserialize;

use crate::domain::{CandidateStrategy, CandidateTable, DomainError, ModelCandidateResolver};
use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to call the API from a browser; empty disables CORS
    pub cors_allowed_origins: Vec<String>,
    /// Request body limit; pipeline requests carry base64 images
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Session token validation
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret the auth service signs session tokens with
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_jwt_audience")]
    pub jwt_audience: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// TOML catalog loaded by the memory backend
    #[serde(default)]
    pub seed_file: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenRouter,
    OpenAi,
    Gemini,
}

impl ProviderKind {
    pub fn default_credential_name(&self) -> &'static str {
        match self {
            Self::OpenRouter => "OPENROUTER_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStrategyKind {
    #[default]
    Table,
    Direct,
}

/// Ordered candidate identifiers per modality
#[derive(Debug, Clone, Deserialize)]
pub struct CandidatesConfig {
    #[serde(default)]
    pub strategy: CandidateStrategyKind,
    #[serde(default = "default_vision_candidates")]
    pub vision: Vec<String>,
    #[serde(default = "default_text_candidates")]
    pub text: Vec<String>,
}

/// Model used by steps whose model reference does not resolve
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultModelConfig {
    #[serde(default = "default_provider_model_id")]
    pub provider_model_id: String,
    #[serde(default = "default_model_label")]
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Environment variable holding the provider credential
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default = "default_referer")]
    pub referer: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub candidates: CandidatesConfig,
    #[serde(default)]
    pub default_model: DefaultModelConfig,
}

fn default_jwt_audience() -> String {
    "authenticated".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_vision_candidates() -> Vec<String> {
    CandidateTable::free_tier().vision().to_vec()
}

fn default_text_candidates() -> Vec<String> {
    CandidateTable::free_tier().text().to_vec()
}

fn default_provider_model_id() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_model_label() -> String {
    "Unknown".to_string()
}

fn default_referer() -> String {
    "https://humorhw2.vercel.app".to_string()
}

fn default_title() -> String {
    "Humor Admin Pipeline".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_allowed_origins: Vec::new(),
            max_body_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_audience: default_jwt_audience(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: None,
            max_connections: default_max_connections(),
            seed_file: None,
        }
    }
}

impl Default for CandidatesConfig {
    fn default() -> Self {
        Self {
            strategy: CandidateStrategyKind::default(),
            vision: default_vision_candidates(),
            text: default_text_candidates(),
        }
    }
}

impl Default for DefaultModelConfig {
    fn default() -> Self {
        Self {
            provider_model_id: default_provider_model_id(),
            label: default_model_label(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: None,
            api_key_env: None,
            referer: default_referer(),
            title: default_title(),
            timeout_secs: default_timeout_secs(),
            candidates: CandidatesConfig::default(),
            default_model: DefaultModelConfig::default(),
        }
    }
}

impl LlmConfig {
    /// Name of the environment variable the credential is read from
    pub fn credential_name(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.provider.default_credential_name())
    }

    /// Build the candidate resolver, validating the preference table
    pub fn candidate_resolver(&self) -> Result<ModelCandidateResolver, DomainError> {
        let table = CandidateTable::new(
            self.candidates.vision.clone(),
            self.candidates.text.clone(),
        )?;

        let strategy = match self.candidates.strategy {
            CandidateStrategyKind::Table => CandidateStrategy::Table(table),
            CandidateStrategyKind::Direct => CandidateStrategy::Direct,
        };

        Ok(ModelCandidateResolver::new(strategy))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject configurations that cannot serve any run
    pub fn validate(&self) -> Result<(), DomainError> {
        self.llm.candidate_resolver()?;

        if self.llm.default_model.provider_model_id.trim().is_empty() {
            return Err(DomainError::configuration(
                "llm.default_model.provider_model_id must not be empty",
            ));
        }

        if self.storage.backend == StorageBackend::Postgres && self.storage.database_url.is_none() {
            return Err(DomainError::configuration(
                "storage.database_url is required for the postgres backend",
            ));
        }

        Ok(())
    }
}
