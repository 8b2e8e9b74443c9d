//! Common utilities for service clients

use std::fmt;

use crate::error::{mapping, ErrorContext, RcaError};
use crate::util::sanitize_for_logging;

/// UserAgent structure for identifying the client to upstream services
#[derive(Debug, Clone)]
pub struct UserAgent {
    /// Application name
    pub app_name: String,

    /// Version string
    pub version: String,

    /// Optional extra info
    pub extra: Option<String>,
}

impl Default for UserAgent {
    fn default() -> Self {
        Self {
            app_name: "alert-rca".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            extra: None,
        }
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app_name, self.version)?;

        if let Some(ref extra) = self.extra {
            write!(f, " ({})", extra)?;
        }

        Ok(())
    }
}

/// Create error context for HTTP requests
pub fn create_error_context(
    service_name: &str,
    endpoint: &str,
    status: Option<reqwest::StatusCode>,
) -> ErrorContext {
    let context = ErrorContext::for_service(service_name).endpoint(endpoint);

    match status {
        Some(status_code) => context.status_code(status_code.as_u16()),
        None => context,
    }
}

/// Turn a non-success HTTP response into an `RcaError`
pub async fn parse_error_response(
    service_name: &str,
    endpoint: &str,
    response: reqwest::Response,
) -> RcaError {
    let status = response.status();
    let mut context = create_error_context(service_name, endpoint, Some(status));

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => format!("Failed to read error response: {}", e),
    };
    context.add("body", sanitize_for_logging(&body));
    context.add("category", mapping::classify_http_error(status));

    mapping::map_http_error(status, &body, &mut context).with_context(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_format() {
        let ua = UserAgent {
            app_name: "alert-rca".to_string(),
            version: "1.2.3".to_string(),
            extra: Some("openrouter".to_string()),
        };
        assert_eq!(ua.to_string(), "alert-rca/1.2.3 (openrouter)");
    }
}
