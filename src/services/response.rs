// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Defensive extraction of answer text from provider responses.
//!
//! Handles both the OpenAI-style `choices` shape and the Gemini
//! `candidates` shape. The first non-empty text wins.

use crate::error::AppError;
use serde_json::Value;

/// Extract the answer text from a successful provider response.
pub fn extract_text(raw: &Value) -> Result<String, AppError> {
    if let Some(choice) = raw.pointer("/choices/0") {
        if let Some(text) = choice_text(choice) {
            return Ok(text);
        }
        if token_count(raw, "/usage/completion_tokens") == 0 {
            return Err(AppError::EmptyGeneration);
        }
        return Err(no_text(choice.get("finish_reason")));
    }

    if let Some(candidate) = raw.pointer("/candidates/0") {
        if let Some(text) = candidate_text(candidate) {
            return Ok(text);
        }
        if token_count(raw, "/usageMetadata/candidatesTokenCount") == 0 {
            return Err(AppError::EmptyGeneration);
        }
        return Err(no_text(candidate.get("finishReason")));
    }

    if let Some(reason) = raw
        .pointer("/promptFeedback/blockReason")
        .and_then(Value::as_str)
    {
        return Err(AppError::Api {
            status: 200,
            message: format!("Prompt blocked: {}", reason),
        });
    }

    Err(AppError::Api {
        status: 200,
        message: "Unexpected response shape".to_string(),
    })
}

/// OpenAI-style choice: `message.content` as a string or a parts array,
/// or a legacy `text` field.
fn choice_text(choice: &Value) -> Option<String> {
    match choice.pointer("/message/content") {
        Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
        Some(Value::Array(parts)) => {
            if let Some(text) = join_parts(parts) {
                return Some(text);
            }
        }
        _ => {}
    }

    choice
        .get("text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Gemini candidate: concatenated `content.parts[*].text`, skipping thoughts.
fn candidate_text(candidate: &Value) -> Option<String> {
    candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .and_then(|parts| join_parts(parts))
}

fn join_parts(parts: &[Value]) -> Option<String> {
    let text: String = parts
        .iter()
        .filter(|p| !p.get("thought").and_then(Value::as_bool).unwrap_or(false))
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Completion tokens reported at `pointer`; absent counts as zero.
fn token_count(raw: &Value, pointer: &str) -> u64 {
    raw.pointer(pointer).and_then(Value::as_u64).unwrap_or(0)
}

fn no_text(reason: Option<&Value>) -> AppError {
    let reason = reason.and_then(Value::as_str).unwrap_or("unknown");
    AppError::Api {
        status: 200,
        message: format!("Response contained no text (finish reason: {})", reason),
    }
}

/// Provider error message from an error body, when parseable.
pub fn error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    let message = match json.get("error") {
        Some(Value::Object(err)) => err.get("message").and_then(Value::as_str),
        Some(Value::String(s)) => Some(s.as_str()),
        _ => json.get("message").and_then(Value::as_str),
    }?;
    let message = message.trim();
    (!message.is_empty()).then(|| message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_choices_and_candidates_normalize_identically() {
        let openai = json!({
            "choices": [{"message": {"role": "assistant", "content": "- Show name: Lost"}}],
            "usage": {"completion_tokens": 6}
        });
        let gemini = json!({
            "candidates": [{"content": {"parts": [{"text": "- Show name: Lost"}], "role": "model"}}],
            "usageMetadata": {"candidatesTokenCount": 6}
        });

        assert_eq!(extract_text(&openai).unwrap(), "- Show name: Lost");
        assert_eq!(extract_text(&gemini).unwrap(), "- Show name: Lost");
    }

    #[test]
    fn test_content_parts_array() {
        let raw = json!({
            "choices": [{"message": {"content": [
                {"type": "text", "text": "Movie title: "},
                {"type": "text", "text": "Heat"}
            ]}}]
        });
        assert_eq!(extract_text(&raw).unwrap(), "Movie title: Heat");
    }

    #[test]
    fn test_legacy_choice_text() {
        let raw = json!({"choices": [{"text": " Season 2 "}]});
        assert_eq!(extract_text(&raw).unwrap(), "Season 2");
    }

    #[test]
    fn test_thought_parts_skipped() {
        let raw = json!({"candidates": [{"content": {"parts": [
            {"text": "thinking...", "thought": true},
            {"text": "Episode 4"}
        ]}}]});
        assert_eq!(extract_text(&raw).unwrap(), "Episode 4");
    }

    #[test]
    fn test_empty_generation_with_zero_tokens() {
        let raw = json!({
            "candidates": [{"content": {"role": "model"}, "finishReason": "MAX_TOKENS"}],
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 0}
        });
        assert!(matches!(
            extract_text(&raw).unwrap_err(),
            AppError::EmptyGeneration
        ));

        let raw = json!({"choices": [{"message": {"content": ""}}], "usage": {"completion_tokens": 0}});
        assert!(matches!(
            extract_text(&raw).unwrap_err(),
            AppError::EmptyGeneration
        ));
    }

    #[test]
    fn test_textless_candidate_with_tokens_is_api_error() {
        let raw = json!({
            "candidates": [{"finishReason": "SAFETY"}],
            "usageMetadata": {"candidatesTokenCount": 3}
        });
        let err = extract_text(&raw).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_blocked_prompt_and_unknown_shape() {
        let raw = json!({"promptFeedback": {"blockReason": "OTHER"}});
        assert!(extract_text(&raw).unwrap_err().to_string().contains("Prompt blocked"));

        let raw = json!({"id": "x"});
        assert!(extract_text(&raw)
            .unwrap_err()
            .to_string()
            .contains("Unexpected response shape"));
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            error_message(r#"{"error": {"code": 403, "message": "Billing not enabled"}}"#).as_deref(),
            Some("Billing not enabled")
        );
        assert_eq!(
            error_message(r#"{"error": "bad key"}"#).as_deref(),
            Some("bad key")
        );
        assert_eq!(error_message("<html>oops</html>"), None);
    }
}
