//! Error handling for the RCA engine
//!
//! Errors never escape `RcaEngine::analyze`; they are rendered into the
//! diagnostic string of a heuristic fallback. They do surface from the
//! advice client itself, from configuration loading and from the alert step.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

pub mod mapping;

/// Result type for RCA operations
pub type Result<T> = std::result::Result<T, RcaError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum RcaError {
    /// Network or connection errors
    #[error("Network error: {0}")]
    Network(String),

    /// The call did not complete within the configured timeout
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Authorization errors (permission issues)
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Rate limiting errors
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Upstream service errors (5xx and unclassified statuses)
    #[error("Service error: {0}")]
    Service(String),

    /// Request or input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Response parsing errors
    #[error("Parsing error: {0}")]
    Parsing(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The advice source cannot be used at all (no credential, no transport)
    #[error("{0}")]
    Unavailable(String),

    /// State store or event emitter failures
    #[error("Storage error: {0}")]
    Storage(String),

    /// Errors with additional context
    #[error("{inner}")]
    WithContext {
        inner: Box<RcaError>,
        context: ErrorContext,
    },
}

impl RcaError {
    pub fn network(message: impl Into<String>) -> Self {
        RcaError::Network(message.into())
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        RcaError::Timeout(message.into())
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        RcaError::Authentication(message.into())
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        RcaError::Authorization(message.into())
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        RcaError::RateLimit(message.into())
    }

    pub fn service(message: impl Into<String>) -> Self {
        RcaError::Service(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        RcaError::Validation(message.into())
    }

    pub fn parsing(message: impl Into<String>) -> Self {
        RcaError::Parsing(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        RcaError::Configuration(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        RcaError::Unavailable(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        RcaError::Storage(message.into())
    }

    /// Add context to an existing error
    pub fn with_context(self, context: ErrorContext) -> Self {
        RcaError::WithContext {
            inner: Box::new(self),
            context,
        }
    }

    /// Get the service name if available
    pub fn service_name(&self) -> Option<&str> {
        match self {
            RcaError::WithContext { context, .. } => Some(&context.service),
            _ => None,
        }
    }

    /// Get the HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RcaError::WithContext { context, .. } => context.status_code,
            _ => None,
        }
    }

    /// The innermost error, with any context wrappers peeled off
    pub fn root(&self) -> &RcaError {
        match self {
            RcaError::WithContext { inner, .. } => inner.root(),
            other => other,
        }
    }

    /// True for failures of the advice transport (network, timeout, HTTP status)
    pub fn is_transport(&self) -> bool {
        matches!(
            self.root(),
            RcaError::Network(_)
                | RcaError::Timeout(_)
                | RcaError::Authentication(_)
                | RcaError::Authorization(_)
                | RcaError::RateLimit(_)
                | RcaError::Service(_)
        )
    }
}

/// Error context information
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Component that generated the error
    pub service: String,

    /// When the error was observed
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,

    /// HTTP status code if applicable
    pub status_code: Option<u16>,

    /// Endpoint that was called
    pub endpoint: Option<String>,

    /// Additional context data
    pub data: HashMap<String, String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            service: "unknown".to_string(),
            timestamp: Some(chrono::Utc::now()),
            status_code: None,
            endpoint: None,
            data: HashMap::new(),
        }
    }
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new error context for a specific service
    pub fn for_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            ..Self::default()
        }
    }

    pub fn status_code(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Add a context value
    pub fn add<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: fmt::Display,
    {
        self.data.insert(key.into(), value.to_string());
    }

    /// Add a context value and return self (builder pattern)
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: fmt::Display,
    {
        self.add(key, value);
        self
    }
}

/// Convert reqwest errors to RcaError
impl From<reqwest::Error> for RcaError {
    fn from(err: reqwest::Error) -> Self {
        let context = ErrorContext::for_service("http_client");

        let error = if err.is_timeout() {
            RcaError::timeout(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            RcaError::network(format!("Connection error: {}", err))
        } else if err.is_redirect() {
            RcaError::network(format!("Too many redirects: {}", err))
        } else if err.is_decode() {
            RcaError::parsing(format!("Response decode error: {}", err))
        } else if err.is_builder() {
            RcaError::configuration(format!("Invalid request: {}", err))
        } else {
            RcaError::network(format!("HTTP client error: {}", err))
        };

        match err.status() {
            Some(status) => error.with_context(context.status_code(status.as_u16())),
            None => error.with_context(context),
        }
    }
}

/// Convert serde_json errors to RcaError
impl From<serde_json::Error> for RcaError {
    fn from(err: serde_json::Error) -> Self {
        RcaError::parsing(format!("JSON error: {}", err))
            .with_context(ErrorContext::for_service("json"))
    }
}
