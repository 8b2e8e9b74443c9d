//! HTTP client builder
//!
//! Assembles the `reqwest::Client` with default headers so that credentials
//! and attribution are attached once, not per request.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Client as ReqwestClient;

use crate::error::{RcaError, Result};
use crate::services::UserAgent;

/// Builder for the advice transport
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    /// Bearer credential
    auth_token: Option<String>,

    /// Custom headers to include with all requests
    custom_headers: BTreeMap<String, String>,

    /// Request timeout
    timeout: Duration,

    /// User agent
    user_agent: UserAgent,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            auth_token: None,
            custom_headers: BTreeMap::new(),
            timeout: Duration::from_secs(30),
            user_agent: UserAgent::default(),
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bearer credential
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Add a custom header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(key.into(), value.into());
        self
    }

    /// Add a custom header when a value is present
    pub fn optional_header(self, key: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(value) if !value.is_empty() => self.header(key, value),
            _ => self,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: UserAgent) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// The default headers the client will send, before the user agent
    pub fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (key, value) in &self.custom_headers {
            let header_name = HeaderName::from_str(key)
                .map_err(|e| RcaError::configuration(format!("Invalid header name: {}", e)))?;

            let header_value = HeaderValue::from_str(value)
                .map_err(|e| RcaError::configuration(format!("Invalid header value: {}", e)))?;

            headers.insert(header_name, header_value);
        }

        if let Some(ref token) = self.auth_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| RcaError::configuration(format!("Invalid auth header: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Build an HTTP client with the configured settings
    pub fn build(&self) -> Result<ReqwestClient> {
        ReqwestClient::builder()
            .default_headers(self.default_headers()?)
            .user_agent(self.user_agent.to_string())
            .timeout(self.timeout)
            .gzip(true)
            .build()
            .map_err(|e| RcaError::configuration(format!("Failed to build HTTP client: {}", e)))
    }
}
