//! Utility module for common functionality

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

/// Truncate a string to at most `max_chars` characters, adding an ellipsis if truncated
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        s.chars().take(max_chars).collect()
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    }
}

static SENSITIVE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"Bearer [A-Za-z0-9\-_.]+", "Bearer [REDACTED]"),
        (r"sk-[A-Za-z0-9\-_]{8,}", "[REDACTED]"),
        (r"(?i)api[_-]?key[=:]\s*[A-Za-z0-9\-_]+", "api_key=[REDACTED]"),
        (r"(?i)password[=:]\s*[^\s&]+", "password=[REDACTED]"),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

/// Sanitize a string for logging (remove sensitive data patterns)
pub fn sanitize_for_logging(s: &str) -> String {
    let mut result = s.to_string();
    for (re, replacement) in SENSITIVE_PATTERNS.iter() {
        result = re.replace_all(&result, *replacement).into_owned();
    }
    result
}

/// Parse a duration from a string (e.g., "30", "12.5", "30s", "500ms", "5m", "1h")
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();

    let secs = |v: &str| {
        v.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && *n >= 0.0)
    };

    if let Some(v) = s.strip_suffix("ms") {
        v.trim().parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(v) = s.strip_suffix('s') {
        secs(v).and_then(|n| Duration::try_from_secs_f64(n).ok())
    } else if let Some(v) = s.strip_suffix('m') {
        secs(v).and_then(|m| Duration::try_from_secs_f64(m * 60.0).ok())
    } else if let Some(v) = s.strip_suffix('h') {
        secs(v).and_then(|h| Duration::try_from_secs_f64(h * 3600.0).ok())
    } else {
        secs(&s).and_then(|n| Duration::try_from_secs_f64(n).ok())
    }
}
