//! OpenRouter chat-completion client
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint. The HTTP
//! client is built once per `OpenRouterClient` and reused by every request;
//! a build failure does not panic but is reported through `preflight`.

mod models;
pub use models::*;

use std::time::Instant;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;

use crate::config::AdvisorConfig;
use crate::core::{AdviceSource, ClientBuilder};
use crate::error::{ErrorContext, RcaError, Result};
use crate::services::common::{parse_error_response, UserAgent};

const SERVICE_NAME: &str = "openrouter";
const CHAT_COMPLETIONS: &str = "chat/completions";

/// OpenRouter API client
#[derive(Debug)]
pub struct OpenRouterClient {
    /// HTTP client, or the reason it could not be built
    http_client: std::result::Result<Client, String>,

    config: AdvisorConfig,
}

impl OpenRouterClient {
    /// Create a client from configuration
    pub fn new(config: AdvisorConfig) -> Self {
        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(UserAgent {
                extra: Some("openrouter".to_string()),
                ..UserAgent::default()
            })
            .optional_header("HTTP-Referer", config.http_referer.as_deref())
            .optional_header("X-Title", config.app_title.as_deref());

        if let Some(ref key) = config.api_key {
            if !key.is_empty() {
                builder = builder.auth_token(key.clone());
            }
        }

        let http_client = builder.build().map_err(|e| {
            warn!("Advice transport unavailable: {}", e);
            e.to_string()
        });

        Self { http_client, config }
    }

    /// Send a chat completion request and decode the envelope
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.preflight()?;
        let client = self
            .http_client
            .as_ref()
            .map_err(|reason| {
                RcaError::unavailable(format!("HTTP client unavailable: {}", reason))
            })?;

        let url = format!("{}/{}", self.config.base_url, CHAT_COMPLETIONS);
        debug!("Sending request to {}: POST {} (model: {})", SERVICE_NAME, url, request.model);

        let start_time = Instant::now();
        let response = client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(parse_error_response(SERVICE_NAME, CHAT_COMPLETIONS, response).await);
        }

        let body = response.text().await?;
        let decoded: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            RcaError::parsing(format!("Failed to parse response: {}", e)).with_context(
                ErrorContext::for_service(SERVICE_NAME)
                    .endpoint(CHAT_COMPLETIONS)
                    .status_code(status.as_u16()),
            )
        })?;

        if let Some(ref usage) = decoded.usage {
            debug!(
                "{} completion finished in {:?}, {} tokens",
                SERVICE_NAME,
                start_time.elapsed(),
                usage.total_tokens
            );
        }

        Ok(decoded)
    }
}

#[async_trait]
impl AdviceSource for OpenRouterClient {
    fn name(&self) -> &str {
        SERVICE_NAME
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn preflight(&self) -> Result<()> {
        if !self.config.has_credential() {
            return Err(RcaError::unavailable("OPENROUTER_API_KEY not set"));
        }

        match self.http_client {
            Ok(_) => Ok(()),
            Err(ref reason) => Err(RcaError::unavailable(format!(
                "HTTP client unavailable: {}",
                reason
            ))),
        }
    }

    async fn complete(&self, request: &ChatCompletionRequest) -> Result<String> {
        let response = self.chat_completion(request).await?;
        response
            .first_content()
            .ok_or_else(|| RcaError::parsing("No completion choices returned"))
    }
}
