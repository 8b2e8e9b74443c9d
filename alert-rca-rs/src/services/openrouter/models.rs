//! Chat-completion wire models
//!
//! Response types are deliberately lenient: providers routed through
//! OpenRouter disagree on which envelope fields they send.

use serde::{Deserialize, Serialize};

/// Chat message role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A chat message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// The role of the message author
    pub role: Role,

    /// The content of the message
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Chat completion request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// ID of the model to use
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// The messages to generate a completion for
    pub messages: Vec<ChatMessage>,
}

/// A message in a chat completion response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionMessage {
    #[serde(default)]
    pub role: Option<String>,

    /// Content of the message; null for some tool-calling providers
    #[serde(default)]
    pub content: Option<String>,
}

/// A chat completion choice
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionChoice {
    #[serde(default)]
    pub message: ChatCompletionMessage,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,

    #[serde(default)]
    pub completion_tokens: u32,

    #[serde(default)]
    pub total_tokens: u32,
}

/// Chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,

    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// Trimmed text of the first choice; `None` when no choice was returned
    pub fn first_content(&self) -> Option<String> {
        self.choices.first().map(|choice| {
            choice
                .message
                .content
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let request = ChatCompletionRequest {
            model: "deepseek/deepseek-r1".to_string(),
            temperature: 0.2,
            messages: vec![ChatMessage::system("be brief"), ChatMessage::user("hi")],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["model"], "deepseek/deepseek-r1");
    }

    #[test]
    fn test_lenient_response() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert_eq!(response.first_content(), Some(String::new()));

        let response: ChatCompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(response.first_content(), None);
    }
}
