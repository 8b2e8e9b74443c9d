//! Resolution engine
//!
//! Tiers run as a pipeline of fallible steps. Each step either hands its
//! output to the next one or yields a [`Fallback`] carrying the diagnostic
//! string; any fallback lands in the keyword heuristic. `analyze` therefore
//! never fails.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use once_cell::sync::OnceCell;
use serde_json::{Map, Value};

use super::coerce::coerce_analysis;
use super::extract::extract_object;
use super::heuristic::heuristic_analysis;
use super::prompt::build_payload;
use super::types::{AnalysisRequest, AnalysisResult, ResolutionPath};
use crate::config::{AdvisorConfig, ConfigProvider, DEFAULT_PROVIDER, DEFAULT_TIMEOUT};
use crate::core::AdviceSource;
use crate::services::openrouter::OpenRouterClient;
use crate::util::{sanitize_for_logging, truncate_string};

/// Diagnostic used when the model text holds no JSON object
pub const PARSE_FAILURE: &str = "Failed to parse JSON response";

/// Signal to skip the remaining advice tiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    pub reason: String,
}

impl Fallback {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

static GLOBAL_ENGINE: OnceCell<RcaEngine> = OnceCell::new();

/// Produces an `AnalysisResult` for every `AnalysisRequest`
pub struct RcaEngine {
    /// The advice source, or why none is usable
    source: std::result::Result<Arc<dyn AdviceSource>, String>,

    /// Upper bound on the single outbound call
    call_timeout: Duration,
}

impl RcaEngine {
    /// Engine backed by an advice source
    pub fn new(source: Arc<dyn AdviceSource>) -> Self {
        Self {
            source: Ok(source),
            call_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Engine that always answers from the heuristic tier
    pub fn heuristic_only(reason: impl Into<String>) -> Self {
        Self {
            source: Err(reason.into()),
            call_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Engine talking to OpenRouter with the given configuration
    pub fn with_config(config: AdvisorConfig) -> Self {
        let timeout = config.timeout;
        Self::new(Arc::new(OpenRouterClient::new(config))).with_call_timeout(timeout)
    }

    /// Engine configured from a config provider. Invalid configuration
    /// degrades to heuristic-only operation.
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Self {
        match AdvisorConfig::from_provider(provider) {
            Ok(config) => Self::with_config(config),
            Err(e) => {
                warn!("Advice source configuration rejected, using heuristics only: {}", e);
                Self::heuristic_only(e.to_string())
            }
        }
    }

    /// Engine configured from the process environment
    pub fn from_env() -> Self {
        Self::from_provider(&**DEFAULT_PROVIDER)
    }

    /// Process-wide engine, built from the environment on first use
    pub fn global() -> &'static RcaEngine {
        GLOBAL_ENGINE.get_or_init(RcaEngine::from_env)
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Model identifier used for advice requests, if a source is configured
    pub fn model(&self) -> Option<&str> {
        self.source.as_ref().ok().map(|source| source.model())
    }

    /// Analyze one request
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        self.resolve(request).await.0
    }

    /// Analyze one request and report which tier answered
    pub async fn resolve(&self, request: &AnalysisRequest) -> (AnalysisResult, ResolutionPath) {
        match self.advise(request).await {
            Ok(result) => (result, ResolutionPath::Advised),
            Err(fallback) => {
                warn!(
                    "Falling back to heuristic RCA for {} on {}: {}",
                    request.alert_type,
                    request.affected_resource,
                    sanitize_for_logging(&fallback.reason)
                );
                (heuristic_analysis(request, fallback.reason), ResolutionPath::Heuristic)
            }
        }
    }

    async fn advise(&self, request: &AnalysisRequest) -> Result<AnalysisResult, Fallback> {
        let source = self.preflight()?;
        let content = self.call(source, request).await?;
        let data = Self::parse(&content)?;
        Ok(coerce_analysis(&data, request, content))
    }

    fn preflight(&self) -> Result<&dyn AdviceSource, Fallback> {
        let source = self.source.as_ref().map_err(Fallback::new)?;
        source
            .preflight()
            .map_err(|e| Fallback::new(e.to_string()))?;
        Ok(&**source)
    }

    async fn call(
        &self,
        source: &dyn AdviceSource,
        request: &AnalysisRequest,
    ) -> Result<String, Fallback> {
        let payload = build_payload(request, source.model());
        debug!("Requesting RCA from {} with model {}", source.name(), payload.model);

        match tokio::time::timeout(self.call_timeout, source.complete(&payload)).await {
            Ok(Ok(content)) => Ok(content),
            Ok(Err(e)) => {
                if e.is_transport() {
                    debug!(
                        "{} transport failure (status: {:?}): {}",
                        source.name(),
                        e.status_code(),
                        e
                    );
                }
                Err(Fallback::new(e.to_string()))
            }
            Err(_) => Err(Fallback::new(format!(
                "Advice request timed out after {:?}",
                self.call_timeout
            ))),
        }
    }

    fn parse(content: &str) -> Result<Map<String, Value>, Fallback> {
        extract_object(content).ok_or_else(|| {
            debug!(
                "Unparseable advice response: {}",
                sanitize_for_logging(&truncate_string(content, 200))
            );
            Fallback::new(PARSE_FAILURE)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::heuristic::RULES;
    use crate::analysis::risk::RiskLevel;
    use crate::error::{RcaError, Result};
    use crate::services::openrouter::ChatCompletionRequest;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Advice source returning canned text and recording payloads
    struct ScriptedSource {
        reply: std::result::Result<String, String>,
        ready: bool,
        delay: Option<Duration>,
        seen: Mutex<Vec<ChatCompletionRequest>>,
    }

    impl ScriptedSource {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                ready: true,
                delay: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                ..Self::replying("")
            }
        }
    }

    #[async_trait]
    impl AdviceSource for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "test-model"
        }

        fn preflight(&self) -> Result<()> {
            if self.ready {
                Ok(())
            } else {
                Err(RcaError::unavailable("OPENROUTER_API_KEY not set"))
            }
        }

        async fn complete(&self, request: &ChatCompletionRequest) -> Result<String> {
            self.seen.lock().unwrap().push(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.reply.clone().map_err(RcaError::network)
        }
    }

    fn disk_request() -> AnalysisRequest {
        AnalysisRequest::new("disk_full", "critical", "disk_usage", 97.0, 90.0, "db-01")
    }

    #[tokio::test]
    async fn test_advised_path() {
        let source = Arc::new(ScriptedSource::replying(
            r#"{"summary": "Disk is full.", "root_cause": "WAL growth", "proposed_fix": "Archive WAL", "risk_level": "medium"}"#,
        ));
        let engine = RcaEngine::new(source.clone());

        let (result, path) = engine.resolve(&disk_request()).await;

        assert_eq!(path, ResolutionPath::Advised);
        assert_eq!(result.root_cause, "WAL growth");
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_eq!(result.estimated_impact, RiskLevel::Medium.impact());
        assert!(result.raw_response.starts_with("{\"summary\""));
        assert_eq!(source.seen.lock().unwrap()[0].model, "test-model");
    }

    #[tokio::test]
    async fn test_preflight_failure_skips_the_call() {
        let source = Arc::new(ScriptedSource {
            ready: false,
            ..ScriptedSource::replying("{}")
        });
        let engine = RcaEngine::new(source.clone());

        let (result, path) = engine.resolve(&disk_request()).await;

        assert_eq!(path, ResolutionPath::Heuristic);
        assert_eq!(result.raw_response, "OPENROUTER_API_KEY not set");
        assert!(source.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_becomes_diagnostic() {
        let engine = RcaEngine::new(Arc::new(ScriptedSource::failing("connection refused")));

        let result = engine.analyze(&disk_request()).await;

        assert_eq!(result.raw_response, "Network error: connection refused");
        assert_eq!(result.root_cause, RULES[0].root_cause);
    }

    #[tokio::test]
    async fn test_malformed_json_falls_back() {
        let source = ScriptedSource::replying("Sure! {\"summary\": \"ok\"");
        let engine = RcaEngine::new(Arc::new(source));

        let (result, path) = engine.resolve(&disk_request()).await;

        assert_eq!(path, ResolutionPath::Heuristic);
        assert_eq!(result.raw_response, PARSE_FAILURE);
        assert_eq!(result.root_cause, RULES[0].root_cause);
    }

    #[tokio::test]
    async fn test_non_object_json_falls_back() {
        let engine = RcaEngine::new(Arc::new(ScriptedSource::replying("[\"high\"]")));

        let result = engine.analyze(&disk_request()).await;

        assert_eq!(result.raw_response, PARSE_FAILURE);
    }

    #[tokio::test]
    async fn test_slow_source_times_out() {
        let source = ScriptedSource {
            delay: Some(Duration::from_secs(5)),
            ..ScriptedSource::replying("{\"summary\": \"late\"}")
        };
        let engine = RcaEngine::new(Arc::new(source)).with_call_timeout(Duration::from_millis(20));

        let (result, path) = engine.resolve(&disk_request()).await;

        assert_eq!(path, ResolutionPath::Heuristic);
        assert!(result.raw_response.starts_with("Advice request timed out"));
    }

    #[tokio::test]
    async fn test_heuristic_only_engine() {
        let engine = RcaEngine::heuristic_only("advice disabled");
        assert!(engine.model().is_none());

        let result = engine.analyze(&disk_request()).await;
        assert_eq!(result.raw_response, "advice disabled");
        assert_eq!(result.risk_level, RiskLevel::High);
    }
}
