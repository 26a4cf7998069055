use serde::{Deserialize, Serialize};

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
        }
    }
}

/// Base64 image payload attached to a multimodal user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInput {
    /// Already base64-encoded image bytes
    pub data: String,
    /// MIME type, e.g. `image/png`
    pub media_type: String,
}

impl ImageInput {
    pub fn new(data: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
        }
    }

    /// Build an image only when both the payload and its MIME type are present
    pub fn from_parts(data: Option<&str>, media_type: Option<&str>) -> Option<Self> {
        match (data, media_type) {
            (Some(data), Some(mime)) if !data.is_empty() && !mime.is_empty() => {
                Some(Self::new(data, mime))
            }
            _ => None,
        }
    }

    /// `data:<mime>;base64,<data>`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// Content part for multimodal messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    Image { image: ImageInput },
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    #[serde(flatten)]
    content: MessageContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum MessageContent {
    Text { content: String },
    Parts { content: Vec<ContentPart> },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: MessageContent::Text {
                content: content.into(),
            },
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::Text {
                content: content.into(),
            },
        }
    }

    /// User message carrying the image first, then the text
    pub fn user_with_image(text: impl Into<String>, image: ImageInput) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::Parts {
                content: vec![
                    ContentPart::Image { image },
                    ContentPart::Text { text: text.into() },
                ],
            },
        }
    }

    pub fn content_text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text { content } => Some(content),
            MessageContent::Parts { content } => content.iter().find_map(|p| {
                if let ContentPart::Text { text } = p {
                    Some(text.as_str())
                } else {
                    None
                }
            }),
        }
    }

    pub fn content_parts(&self) -> Vec<&ContentPart> {
        match &self.content {
            MessageContent::Text { .. } => vec![],
            MessageContent::Parts { content } => content.iter().collect(),
        }
    }

    pub fn is_multimodal(&self) -> bool {
        matches!(self.content, MessageContent::Parts { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Describe this");
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content_text(), Some("Describe this"));
        assert!(!msg.is_multimodal());
    }

    #[test]
    fn test_user_with_image_orders_image_first() {
        let msg = Message::user_with_image("caption it", ImageInput::new("AAAA", "image/png"));
        let parts = msg.content_parts();

        assert_eq!(parts.len(), 2);
        assert!(matches!(parts[0], ContentPart::Image { .. }));
        assert_eq!(msg.content_text(), Some("caption it"));
    }

    #[test]
    fn test_data_uri() {
        let image = ImageInput::new("aGVsbG8=", "image/jpeg");
        assert_eq!(image.data_uri(), "data:image/jpeg;base64,aGVsbG8=");
    }

    #[test]
    fn test_image_requires_both_parts() {
        assert!(ImageInput::from_parts(Some("AAAA"), None).is_none());
        assert!(ImageInput::from_parts(None, Some("image/png")).is_none());
        assert!(ImageInput::from_parts(Some(""), Some("image/png")).is_none());
        assert!(ImageInput::from_parts(Some("AAAA"), Some("image/png")).is_some());
    }
}
