//! Claude Messages API request and response models.
//!
//! Only the subset of the wire format the relay needs: a fixed request and
//! the parts of the reply that carry text, an error, or token usage.

use crate::core::{AppError, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Constants for the fixed upstream call.
pub mod constants {
    /// Value of the `anthropic-version` header.
    pub const ANTHROPIC_VERSION: &str = "2023-06-01";

    pub const MODEL: &str = "claude-sonnet-4-5";
    pub const MAX_TOKENS: u32 = 1024;

    pub const SYSTEM_PROMPT: &str = "You are an expert Python developer. Always provide clean, well-documented code with type hints and docstrings. Include error handling.";
    pub const USER_PROMPT: &str = "Write a function to validate email addresses.";

    // Role constants
    pub const ROLE_USER: &str = "user";

    // Content type constants
    pub const CONTENT_TEXT: &str = "text";
}

// ============================================================================
// Request Types
// ============================================================================

/// A message in Claude conversation format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaudeMessage {
    pub role: String,
    pub content: String,
}

impl ClaudeMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: constants::ROLE_USER.to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `POST /v1/messages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaudeMessagesRequest {
    /// The model to use for completion
    pub model: String,

    /// Maximum number of tokens to generate
    pub max_tokens: u32,

    /// System prompt
    pub system: String,

    /// List of messages in the conversation
    pub messages: Vec<ClaudeMessage>,
}

impl ClaudeMessagesRequest {
    /// The one request this server ever sends.
    ///
    /// Built fresh for every call and never mutated.
    pub fn fixed() -> Self {
        Self {
            model: constants::MODEL.to_string(),
            max_tokens: constants::MAX_TOKENS,
            system: constants::SYSTEM_PROMPT.to_string(),
            messages: vec![ClaudeMessage::user(constants::USER_PROMPT)],
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// A content block of a reply. Non-text blocks carry no `text`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaudeContentBlock {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Structured error returned by the upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaudeApiError {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// The `error` field of a reply, in whatever shape the upstream sent it.
///
/// The documented shape is an object with `type` and `message`, but a bare
/// string or any other JSON value still marks the reply as failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaudeErrorField {
    Structured(ClaudeApiError),
    Message(String),
    Other(serde_json::Value),
}

impl ClaudeErrorField {
    /// Upstream error class, when the upstream named one.
    pub fn error_type(&self) -> Option<&str> {
        match self {
            Self::Structured(error) => error.error_type.as_deref(),
            Self::Message(_) | Self::Other(_) => None,
        }
    }

    /// Message passed through to the caller.
    pub fn into_message(self) -> String {
        match self {
            Self::Structured(error) => error.message,
            Self::Message(message) => message,
            Self::Other(value) => value.to_string(),
        }
    }
}

/// Token usage information from Claude API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaudeUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

/// Reply from `POST /v1/messages`, success or error.
///
/// Both shapes deserialize into this one struct; [`into_text`](Self::into_text)
/// decides which one it was.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaudeMessagesResponse {
    #[serde(default)]
    pub content: Vec<ClaudeContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ClaudeErrorField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ClaudeUsage>,
}

impl ClaudeMessagesResponse {
    /// Map the reply to the relay outcome.
    ///
    /// A non-null `error` field wins over any content. Otherwise the first
    /// content block's text is the result, provided that block is untyped or
    /// a `text` block.
    pub fn into_text(self) -> Result<String> {
        if let Some(error) = self.error {
            tracing::debug!(
                error_type = error.error_type().unwrap_or("unknown"),
                "Upstream reply carries an error"
            );
            return Err(AppError::Upstream(error.into_message()));
        }

        self.content
            .into_iter()
            .next()
            .filter(|block| {
                block
                    .content_type
                    .as_deref()
                    .map_or(true, |kind| kind == constants::CONTENT_TEXT)
            })
            .and_then(|block| block.text)
            .ok_or(AppError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixed_request_wire_format() {
        let value = serde_json::to_value(ClaudeMessagesRequest::fixed()).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "claude-sonnet-4-5",
                "max_tokens": 1024,
                "system": "You are an expert Python developer. Always provide clean, well-documented code with type hints and docstrings. Include error handling.",
                "messages": [
                    {"role": "user", "content": "Write a function to validate email addresses."}
                ]
            })
        );
    }

    #[test]
    fn test_fixed_request_is_stable() {
        let first = serde_json::to_string(&ClaudeMessagesRequest::fixed()).unwrap();
        let second = serde_json::to_string(&ClaudeMessagesRequest::fixed()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_success_reply() {
        let reply: ClaudeMessagesResponse = serde_json::from_value(json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": "hello"}],
            "model": "claude-sonnet-4-5",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 12, "output_tokens": 3}
        }))
        .unwrap();

        assert_eq!(reply.usage.as_ref().unwrap().output_tokens, 3);
        assert_eq!(reply.into_text().unwrap(), "hello");
    }

    #[test]
    fn test_minimal_success_reply() {
        let reply: ClaudeMessagesResponse =
            serde_json::from_str(r#"{"content":[{"text":"hello"}]}"#).unwrap();
        assert_eq!(reply.into_text().unwrap(), "hello");
    }

    #[test]
    fn test_only_first_block_is_used() {
        let reply: ClaudeMessagesResponse = serde_json::from_value(json!({
            "content": [{"type": "text", "text": "first"}, {"type": "text", "text": "second"}]
        }))
        .unwrap();
        assert_eq!(reply.into_text().unwrap(), "first");
    }

    #[test]
    fn test_error_reply() {
        let reply: ClaudeMessagesResponse = serde_json::from_value(json!({
            "type": "error",
            "error": {"type": "rate_limit_error", "message": "rate limited"}
        }))
        .unwrap();

        match reply.into_text() {
            Err(AppError::Upstream(message)) => assert_eq!(message, "rate limited"),
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_wins_over_content() {
        let reply: ClaudeMessagesResponse = serde_json::from_value(json!({
            "content": [{"type": "text", "text": "ignored"}],
            "error": {"message": "overloaded"}
        }))
        .unwrap();

        assert!(matches!(reply.into_text(), Err(AppError::Upstream(m)) if m == "overloaded"));
    }

    #[test]
    fn test_empty_content() {
        let reply: ClaudeMessagesResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(matches!(reply.into_text(), Err(AppError::EmptyContent)));

        let reply: ClaudeMessagesResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(reply.into_text(), Err(AppError::EmptyContent)));
    }

    #[test]
    fn test_string_error_reply() {
        let reply: ClaudeMessagesResponse =
            serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert!(matches!(reply.into_text(), Err(AppError::Upstream(m)) if m == "boom"));
    }

    #[test]
    fn test_non_string_error_reply() {
        let reply: ClaudeMessagesResponse =
            serde_json::from_value(json!({"error": 503})).unwrap();
        assert!(matches!(reply.into_text(), Err(AppError::Upstream(m)) if m == "503"));

        // Object without a usable message still counts as an upstream error
        let reply: ClaudeMessagesResponse =
            serde_json::from_value(json!({"error": {"message": 7}})).unwrap();
        assert!(matches!(reply.into_text(), Err(AppError::Upstream(m)) if m == r#"{"message":7}"#));
    }

    #[test]
    fn test_null_error_is_ignored() {
        let reply: ClaudeMessagesResponse = serde_json::from_value(json!({
            "content": [{"type": "text", "text": "fine"}],
            "error": null
        }))
        .unwrap();
        assert_eq!(reply.into_text().unwrap(), "fine");
    }

    #[test]
    fn test_error_type_is_exposed() {
        let reply: ClaudeMessagesResponse = serde_json::from_value(json!({
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        }))
        .unwrap();
        assert_eq!(reply.error.as_ref().unwrap().error_type(), Some("overloaded_error"));
    }

    #[test]
    fn test_non_text_first_block_with_text_field() {
        let reply: ClaudeMessagesResponse = serde_json::from_value(json!({
            "content": [
                {"type": "thinking", "text": "internal"},
                {"type": "text", "text": "answer"}
            ]
        }))
        .unwrap();
        assert!(matches!(reply.into_text(), Err(AppError::EmptyContent)));
    }

    #[test]
    fn test_first_block_without_text() {
        let reply: ClaudeMessagesResponse = serde_json::from_value(json!({
            "content": [{"type": "tool_use", "id": "toolu_1", "name": "x", "input": {}}]
        }))
        .unwrap();
        assert!(matches!(reply.into_text(), Err(AppError::EmptyContent)));
    }
}
