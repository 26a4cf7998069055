use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::gemini::GeminiProvider;
use super::http_client::HttpClient;
use super::openai_compatible::OpenAiCompatibleProvider;
use crate::config::{LlmConfig, ProviderKind};
use crate::domain::{DomainError, LlmProvider};

/// Factory for creating the configured LLM provider
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create the provider, reading the credential from the environment.
    ///
    /// A missing credential is not an error here: the provider reports it
    /// on first use, which fails the step being executed.
    pub fn create(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let credential_name = config.credential_name().to_string();
        let api_key = std::env::var(&credential_name)
            .ok()
            .filter(|key| !key.trim().is_empty());

        if api_key.is_none() {
            warn!(variable = %credential_name, "LLM credential not set; pipeline steps will fail");
        }

        Self::create_with_key(config, api_key)
    }

    /// Create the provider with an explicit credential
    pub fn create_with_key(
        config: &LlmConfig,
        api_key: Option<String>,
    ) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let http_client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))
            .map_err(|e| DomainError::configuration(e.to_string()))?;
        let credential_name = config.credential_name().to_string();

        info!(provider = ?config.provider, "Creating LLM provider");

        let provider: Arc<dyn LlmProvider> = match config.provider {
            ProviderKind::OpenRouter => {
                let mut provider = OpenAiCompatibleProvider::openrouter(http_client, api_key)
                    .with_credential_name(credential_name)
                    .with_attribution(&config.referer, &config.title);

                if let Some(ref base_url) = config.base_url {
                    provider = provider.with_base_url(base_url);
                }

                Arc::new(provider)
            }
            ProviderKind::OpenAi => {
                let mut provider = OpenAiCompatibleProvider::openai(http_client, api_key)
                    .with_credential_name(credential_name);

                if let Some(ref base_url) = config.base_url {
                    provider = provider.with_base_url(base_url);
                }

                Arc::new(provider)
            }
            ProviderKind::Gemini => {
                let mut provider =
                    GeminiProvider::new(http_client, api_key).with_credential_name(credential_name);

                if let Some(ref base_url) = config.base_url {
                    provider = provider.with_base_url(base_url);
                }

                Arc::new(provider)
            }
        };

        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_each_provider() {
        for (kind, name) in [
            (ProviderKind::OpenRouter, "openrouter"),
            (ProviderKind::OpenAi, "openai"),
            (ProviderKind::Gemini, "gemini"),
        ] {
            let config = LlmConfig {
                provider: kind,
                ..LlmConfig::default()
            };

            let provider = LlmProviderFactory::create_with_key(&config, Some("k".into())).unwrap();
            assert_eq!(provider.provider_name(), name);
        }
    }

    #[tokio::test]
    async fn test_missing_key_surfaces_on_use() {
        let config = LlmConfig {
            api_key_env: Some("HUMOR_PIPELINE_TEST_UNSET_KEY".to_string()),
            ..LlmConfig::default()
        };

        let provider = LlmProviderFactory::create_with_key(&config, None).unwrap();
        let request = crate::domain::LlmRequest::builder().user("hi").build();

        let err = provider.chat("m", &request).await.unwrap_err();
        assert_eq!(err.to_string(), "HUMOR_PIPELINE_TEST_UNSET_KEY not configured");
    }
}
