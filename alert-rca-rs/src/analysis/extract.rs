//! JSON recovery from model text

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// First `{` through last `}`, across newlines
static OBJECT_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Parse model text as JSON: the whole text first, then the widest `{...}` span.
pub fn extract_json(content: &str) -> Option<Value> {
    let content = content.trim();
    if content.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(content) {
        return Some(value);
    }

    let span = OBJECT_SPAN.find(content)?;
    serde_json::from_str::<Value>(span.as_str()).ok()
}

/// Like [`extract_json`], but only accepts an object
pub fn extract_object(content: &str) -> Option<Map<String, Value>> {
    match extract_json(content)? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
