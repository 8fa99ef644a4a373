//! Text-generation collaborator
//!
//! Plans and meal suggestions come from an external chat-completion endpoint.
//! Its output is treated as unreliable: callers parse it with
//! [`extract_json`] and surface every failure as a [`GenerationError`].
//! Numeric targets are never taken from generated text.

mod json;
mod openai_compatible;

pub use json::{extract_json, parse_json};
pub use openai_compatible::OpenAiCompatibleGenerator;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Message Types
// ============================================================================

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
            MessageRole::System => "system",
            MessageRole::User => "user",
        }
    }
}

/// A single message in a chat conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// One generation call: a system instruction and a user prompt
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub messages: Vec<ChatMessage>,
}

impl GenerationRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
        }
    }

    /// Content of the user prompt
    pub fn prompt(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// The generation service failed or returned unusable content.
///
/// Distinct from calculator errors: targets computed before the call stay valid.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("text generation is not configured")]
    NotConfigured,

    #[error("request to generation service failed: {0}")]
    Http(String),

    #[error("generation service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("generation service rate limit exceeded")]
    RateLimited,

    #[error("generation service timed out")]
    Timeout,

    #[error("generation service returned no content")]
    EmptyResponse,

    #[error("generated content is not valid JSON: {0}")]
    MalformedJson(String),
}

impl GenerationError {
    /// Stable machine-readable reason for API error details
    pub fn reason(&self) -> &'static str {
        match self {
            GenerationError::NotConfigured => "not_configured",
            GenerationError::Http(_) => "http",
            GenerationError::Status { .. } => "status",
            GenerationError::RateLimited => "rate_limited",
            GenerationError::Timeout => "timeout",
            GenerationError::EmptyResponse => "empty_response",
            GenerationError::MalformedJson(_) => "malformed_json",
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerationError::Timeout
        } else {
            GenerationError::Http(err.to_string())
        }
    }
}

// ============================================================================
// Generator Trait
// ============================================================================

/// Produces free text for a prompt
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_request_roles() {
        let request = GenerationRequest::new("be terse", "plan my week");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.prompt(), "plan my week");
    }

    #[test]
    fn test_error_reasons_are_distinct() {
        let reasons = [
            GenerationError::NotConfigured.reason(),
            GenerationError::Http(String::new()).reason(),
            GenerationError::Status {
                status: 500,
                body: String::new(),
            }
            .reason(),
            GenerationError::RateLimited.reason(),
            GenerationError::Timeout.reason(),
            GenerationError::EmptyResponse.reason(),
            GenerationError::MalformedJson(String::new()).reason(),
        ];
        let mut unique = reasons.to_vec();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), reasons.len());
    }

    #[test]
    fn test_message_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }
}
