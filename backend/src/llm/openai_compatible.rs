//! OpenAI-compatible chat completion client
//!
//! Works against any endpoint speaking `POST {base_url}/chat/completions`
//! (OpenAI, Perplexity, Ollama, vLLM).

use super::{ChatMessage, GenerationError, GenerationRequest, TextGenerator};
use crate::config::GeneratorConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Longest error body kept in a [`GenerationError::Status`]
const MAX_ERROR_BODY_CHARS: usize = 500;

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

// ============================================================================
// Generator
// ============================================================================

/// Chat-completion backed [`TextGenerator`]
pub struct OpenAiCompatibleGenerator {
    name: String,
    client: Client,
    config: GeneratorConfig,
    api_key: Option<SecretString>,
}

impl OpenAiCompatibleGenerator {
    /// Build a generator from config. A missing API key is not an error here;
    /// calls fail with [`GenerationError::NotConfigured`] instead.
    pub fn new(name: impl Into<String>, config: &GeneratorConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let api_key = config
            .api_key
            .as_ref()
            .filter(|key| !key.trim().is_empty())
            .map(|key| SecretString::new(key.clone()));

        Ok(Self {
            name: name.into(),
            client,
            config: config.clone(),
            api_key,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn status_error(status: StatusCode, body: &str) -> GenerationError {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return GenerationError::RateLimited;
        }
        GenerationError::Status {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let api_key = self.api_key.as_ref().ok_or(GenerationError::NotConfigured)?;

        let body = CompletionRequest {
            model: &self.config.model,
            messages: &request.messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            response_format: self.config.json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        debug!(
            generator = %self.name,
            model = %self.config.model,
            prompt_chars = request.prompt().len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(generator = %self.name, status = status.as_u16(), "Generation request failed");
            return Err(Self::status_error(status, &text));
        }

        let completion: CompletionResponse = serde_json::from_str(&text).map_err(|e| {
            GenerationError::MalformedJson(format!("invalid completion envelope: {}", e))
        })?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or(GenerationError::EmptyResponse)?;

        let content = choice
            .message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        debug!(
            generator = %self.name,
            content_chars = content.len(),
            finish_reason = ?choice.finish_reason,
            "Received completion"
        );

        Ok(content)
    }
}
