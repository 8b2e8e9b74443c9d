//! Analysis request and result types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::risk::RiskLevel;

/// Canonical input of one root-cause analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub alert_type: String,
    pub severity: String,
    pub metric: String,
    pub current_value: f64,
    pub threshold: f64,
    pub affected_resource: String,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl AnalysisRequest {
    pub fn new(
        alert_type: impl Into<String>,
        severity: impl Into<String>,
        metric: impl Into<String>,
        current_value: f64,
        threshold: f64,
        affected_resource: impl Into<String>,
    ) -> Self {
        Self {
            alert_type: alert_type.into(),
            severity: severity.into(),
            metric: metric.into(),
            current_value,
            threshold,
            affected_resource: affected_resource.into(),
            logs: Vec::new(),
            metadata: Map::new(),
        }
    }

    pub fn with_logs<I, S>(mut self, logs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.logs = logs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// `metadata.service` rendered as text, if present and non-null
    pub fn service(&self) -> Option<String> {
        match self.metadata.get("service")? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Canonical, fully populated analysis outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub root_cause: String,
    pub proposed_fix: String,
    pub risk_level: RiskLevel,
    pub estimated_impact: String,
    /// Model text on success, fallback reason otherwise. Advisory only.
    #[serde(default)]
    pub raw_response: String,
}

/// Which tier produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    /// The model's JSON was coerced into the result
    Advised,
    /// The deterministic keyword heuristic produced the result
    Heuristic,
}
