//! Error mapping for chat-completion APIs
//!
//! Converts non-success HTTP responses from the advice source into
//! `RcaError` values.

use reqwest::StatusCode;
use serde_json::Value;

use super::{ErrorContext, RcaError};

/// Map an OpenAI-compatible error body (`{"error": {"message", "type", "code"}}`)
pub fn map_chat_api_error(
    status: StatusCode,
    json: &Value,
    context: &mut ErrorContext,
) -> RcaError {
    let message = match json.get("error") {
        Some(error) => {
            if let Some(error_type) = error.get("type").and_then(|t| t.as_str()) {
                context.add("error_type", error_type);
            }

            // OpenRouter sends numeric codes, OpenAI sends strings
            match error.get("code") {
                Some(Value::String(code)) => context.add("error_code", code),
                Some(Value::Number(code)) => context.add("error_code", code),
                _ => {}
            }

            error
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| error.as_str())
                .unwrap_or("Unknown advice source error")
        }
        None => json
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error"),
    };

    from_status(status, message)
}

/// Map a generic HTTP error to an RcaError
pub fn map_http_error(status: StatusCode, body: &str, context: &mut ErrorContext) -> RcaError {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if json.is_object() {
            return map_chat_api_error(status, &json, context);
        }
    }

    let message = if body.is_empty() {
        status.to_string()
    } else if body.chars().count() > 100 {
        let preview: String = body.chars().take(100).collect();
        format!("{}: {}...", status, preview)
    } else {
        format!("{}: {}", status, body)
    };

    from_status(status, message)
}

fn from_status(status: StatusCode, message: impl Into<String>) -> RcaError {
    let message = message.into();
    match status {
        StatusCode::UNAUTHORIZED => RcaError::authentication(message),
        StatusCode::FORBIDDEN => RcaError::authorization(message),
        StatusCode::TOO_MANY_REQUESTS => RcaError::rate_limit(message),
        StatusCode::BAD_REQUEST => RcaError::validation(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => RcaError::timeout(message),
        _ => RcaError::service(message),
    }
}

/// Helper function to classify HTTP errors by category
pub fn classify_http_error(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "validation",
        401 => "authentication",
        403 => "authorization",
        404 => "not_found",
        408 | 504 => "timeout",
        429 => "rate_limit",
        500..=599 => "server",
        _ => "unknown",
    }
}
