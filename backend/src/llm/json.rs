//! Best-effort JSON extraction from generated text

use super::GenerationError;
use regex_lite::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::OnceLock;

static FENCED_BLOCK: OnceLock<Option<Regex>> = OnceLock::new();

fn fenced_block() -> Option<&'static Regex> {
    FENCED_BLOCK
        .get_or_init(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").ok())
        .as_ref()
}

/// Pull a JSON object out of generated text.
///
/// Tries, in order: the whole text, the first fenced code block, and the
/// slice between the first `{` and the last `}`. Only objects are accepted.
pub fn extract_json(text: &str) -> Result<Value, GenerationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let fenced = fenced_block()
        .and_then(|re| re.captures(trimmed))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());

    let braces = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&trimmed[start..=end]),
        _ => None,
    };

    let mut last_error = None;
    for candidate in [Some(trimmed), fenced, braces].into_iter().flatten() {
        match serde_json::from_str::<Value>(candidate) {
            Ok(value @ Value::Object(_)) => return Ok(value),
            Ok(_) => last_error = Some("expected a JSON object".to_string()),
            Err(e) => last_error = Some(e.to_string()),
        }
    }

    Err(GenerationError::MalformedJson(
        last_error.unwrap_or_else(|| "no JSON object found".to_string()),
    ))
}

/// [`extract_json`] followed by deserialization into `T`
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, GenerationError> {
    let value = extract_json(text)?;
    serde_json::from_value(value).map_err(|e| GenerationError::MalformedJson(e.to_string()))
}
