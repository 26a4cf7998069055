use serde::{Deserialize, Serialize};

use super::{ImageInput, Message};

/// A single chat completion request, independent of the provider wire format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmRequest {
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl LlmRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            temperature: None,
        }
    }

    pub fn builder() -> LlmRequestBuilder {
        LlmRequestBuilder::new()
    }

    /// The system message text, if any
    pub fn system_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == super::MessageRole::System)
            .and_then(|m| m.content_text())
    }
}

/// Builder for LlmRequest
#[derive(Debug, Default)]
pub struct LlmRequestBuilder {
    messages: Vec<Message>,
    temperature: Option<f32>,
}

impl LlmRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Adds a system message unless the content is empty
    pub fn system(self, content: impl Into<String>) -> Self {
        let content = content.into();

        if content.is_empty() {
            return self;
        }

        self.message(Message::system(content))
    }

    pub fn user(self, content: impl Into<String>) -> Self {
        self.message(Message::user(content))
    }

    /// Adds the user message, multimodal when an image is supplied
    pub fn user_with_optional_image(
        self,
        content: impl Into<String>,
        image: Option<ImageInput>,
    ) -> Self {
        match image {
            Some(image) => self.message(Message::user_with_image(content, image)),
            None => self.user(content),
        }
    }

    pub fn temperature(mut self, temp: Option<f32>) -> Self {
        self.temperature = temp;
        self
    }

    pub fn build(self) -> LlmRequest {
        LlmRequest {
            messages: self.messages,
            temperature: self.temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MessageRole;

    #[test]
    fn test_builder_skips_empty_system_prompt() {
        let request = LlmRequest::builder().system("").user("hi").build();

        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, MessageRole::User);
        assert!(request.system_text().is_none());
    }

    #[test]
    fn test_builder_with_image() {
        let request = LlmRequest::builder()
            .system("You are funny")
            .user_with_optional_image("caption", Some(ImageInput::new("AAAA", "image/png")))
            .temperature(Some(0.7))
            .build();

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.system_text(), Some("You are funny"));
        assert!(request.messages[1].is_multimodal());
        assert_eq!(request.temperature, Some(0.7));
    }

    #[test]
    fn test_temperature_omitted_from_serialization() {
        let request = LlmRequest::builder().user("hi").temperature(None).build();
        let json = serde_json::to_value(&request).unwrap();

        assert!(json.get("temperature").is_none());
    }
}
