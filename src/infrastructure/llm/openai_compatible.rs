use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::http_client::HttpClientTrait;
use crate::domain::{
    CompletionError, ContentPart, LlmProvider, LlmRequest, LlmResponse, Message, MessageRole,
};

pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Chat-completions provider speaking the OpenAI wire format
/// (OpenRouter, OpenAI and compatible gateways)
#[derive(Debug)]
pub struct OpenAiCompatibleProvider<C: HttpClientTrait> {
    client: C,
    name: &'static str,
    api_key: Option<String>,
    /// Environment variable the key is read from, used in error messages
    credential_name: String,
    base_url: String,
    /// `HTTP-Referer` and `X-Title` attribution headers
    attribution: Option<(String, String)>,
}

impl<C: HttpClientTrait> OpenAiCompatibleProvider<C> {
    pub fn openrouter(client: C, api_key: Option<String>) -> Self {
        Self {
            client,
            name: "openrouter",
            api_key,
            credential_name: "OPENROUTER_API_KEY".to_string(),
            base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            attribution: None,
        }
    }

    pub fn openai(client: C, api_key: Option<String>) -> Self {
        Self {
            client,
            name: "openai",
            api_key,
            credential_name: "OPENAI_API_KEY".to_string(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            attribution: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_credential_name(mut self, name: impl Into<String>) -> Self {
        self.credential_name = name.into();
        self
    }

    pub fn with_attribution(mut self, referer: impl Into<String>, title: impl Into<String>) -> Self {
        self.attribution = Some((referer.into(), title.into()));
        self
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(&self, model: &str, request: &LlmRequest) -> Value {
        let messages: Vec<OpenAiMessage> =
            request.messages.iter().map(OpenAiMessage::from_domain).collect();

        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
        });

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        body
    }

    fn headers<'a>(&'a self, auth_header: &'a str) -> Vec<(&'a str, &'a str)> {
        let mut headers = vec![
            ("Authorization", auth_header),
            ("Content-Type", "application/json"),
        ];

        if let Some((referer, title)) = &self.attribution {
            headers.push(("HTTP-Referer", referer.as_str()));
            headers.push(("X-Title", title.as_str()));
        }

        headers
    }
}

/// `choices[0].message.content`, or empty when the body has another shape
fn extract_content(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.pointer("/choices/0/message/content")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_default()
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiCompatibleProvider<C> {
    async fn chat(&self, model: &str, request: &LlmRequest) -> Result<LlmResponse, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CompletionError::missing_credential(&self.credential_name))?;

        let auth_header = format!("Bearer {}", api_key);
        let body = self.build_request(model, request);

        let response = self
            .client
            .post_json(&self.chat_completions_url(), self.headers(&auth_header), &body)
            .await
            .map_err(|e| match e {
                CompletionError::Transport { message, .. } => {
                    CompletionError::transport(self.name, message)
                }
                other => other,
            })?;

        if !response.is_success() {
            return Err(CompletionError::from_status(
                self.name,
                model,
                response.status,
                response.body,
            ));
        }

        Ok(LlmResponse::new(extract_content(&response.body), model))
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }
}

// OpenAI wire types

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: &'static str,
    content: OpenAiContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum OpenAiContent {
    Text(String),
    Parts(Vec<OpenAiContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OpenAiContentPart {
    ImageUrl { image_url: OpenAiImageUrl },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct OpenAiImageUrl {
    url: String,
}

impl OpenAiMessage {
    fn from_domain(message: &Message) -> Self {
        let role = match message.role {
            MessageRole::System => "system",
            MessageRole::User => "user",
        };

        let content = if message.is_multimodal() {
            OpenAiContent::Parts(
                message
                    .content_parts()
                    .into_iter()
                    .map(|part| match part {
                        ContentPart::Image { image } => OpenAiContentPart::ImageUrl {
                            image_url: OpenAiImageUrl {
                                url: image.data_uri(),
                            },
                        },
                        ContentPart::Text { text } => OpenAiContentPart::Text { text: text.clone() },
                    })
                    .collect(),
            )
        } else {
            OpenAiContent::Text(message.content_text().unwrap_or_default().to_string())
        };

        Self { role, content }
    }
}
