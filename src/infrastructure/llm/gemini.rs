use async_trait::async_trait;
use serde_json::{json, Value};

use super::http_client::HttpClientTrait;
use crate::domain::{
    CompletionError, ContentPart, LlmProvider, LlmRequest, LlmResponse, MessageRole,
};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini `generateContent` provider
#[derive(Debug)]
pub struct GeminiProvider<C: HttpClientTrait> {
    client: C,
    api_key: Option<String>,
    credential_name: String,
    base_url: String,
}

impl<C: HttpClientTrait> GeminiProvider<C> {
    pub fn new(client: C, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            credential_name: "GEMINI_API_KEY".to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
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

    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    fn build_request(&self, request: &LlmRequest) -> Value {
        let mut body = json!({});

        if let Some(system) = request.system_text() {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }

        let contents: Vec<Value> = request
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .map(|m| {
                let parts: Vec<Value> = if m.is_multimodal() {
                    m.content_parts()
                        .into_iter()
                        .map(|part| match part {
                            ContentPart::Image { image } => json!({
                                "inline_data": {
                                    "mime_type": image.media_type,
                                    "data": image.data,
                                }
                            }),
                            ContentPart::Text { text } => json!({ "text": text }),
                        })
                        .collect()
                } else {
                    vec![json!({ "text": m.content_text().unwrap_or_default() })]
                };

                json!({ "role": "user", "parts": parts })
            })
            .collect();

        body["contents"] = json!(contents);

        if let Some(temp) = request.temperature {
            body["generationConfig"] = json!({ "temperature": temp });
        }

        body
    }
}

/// First candidate's first text part, or empty on any other shape
fn extract_content(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.pointer("/candidates/0/content/parts")
                .and_then(Value::as_array)
                .and_then(|parts| parts.iter().find_map(|p| p.get("text").and_then(Value::as_str)))
                .map(str::to_string)
        })
        .unwrap_or_default()
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for GeminiProvider<C> {
    async fn chat(&self, model: &str, request: &LlmRequest) -> Result<LlmResponse, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CompletionError::missing_credential(&self.credential_name))?;

        let headers = vec![
            ("x-goog-api-key", api_key),
            ("Content-Type", "application/json"),
        ];

        let response = self
            .client
            .post_json(&self.generate_url(model), headers, &self.build_request(request))
            .await?;

        if !response.is_success() {
            return Err(CompletionError::from_status(
                "gemini",
                model,
                response.status,
                response.body,
            ));
        }

        Ok(LlmResponse::new(extract_content(&response.body), model))
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
