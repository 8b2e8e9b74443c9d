//! Alert and RCA record wire shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analysis::{AnalysisRequest, AnalysisResult, RiskLevel};

/// Alert as delivered on the `alert.detected` topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub alert_type: String,
    pub severity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub metric: String,
    pub current_value: f64,
    pub threshold: f64,
    pub affected_resource: String,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Alert {
    /// The analysis input for this alert
    pub fn to_request(&self) -> AnalysisRequest {
        AnalysisRequest {
            alert_type: self.alert_type.clone(),
            severity: self.severity.clone(),
            metric: self.metric.clone(),
            current_value: self.current_value,
            threshold: self.threshold,
            affected_resource: self.affected_resource.clone(),
            logs: self.logs.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Result published on the `rca.completed` topic and kept in `rca-results`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcaRecord {
    pub incident_id: String,
    pub summary: String,
    pub root_cause: String,
    pub proposed_fix: String,
    pub risk_level: RiskLevel,
    pub estimated_impact: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: Map<String, Value>,
}

impl RcaRecord {
    /// Combine an alert with its analysis.
    ///
    /// Metadata starts with `alertType`, `severity` and `rawLLMResponse`; the
    /// alert's own metadata is layered on top so downstream steps see it unchanged.
    pub fn from_analysis(
        alert: &Alert,
        analysis: AnalysisResult,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut metadata = Map::new();
        metadata.insert("alertType".to_string(), Value::String(alert.alert_type.clone()));
        metadata.insert("severity".to_string(), Value::String(alert.severity.clone()));
        metadata.insert("rawLLMResponse".to_string(), Value::String(analysis.raw_response));
        for (key, value) in &alert.metadata {
            metadata.insert(key.clone(), value.clone());
        }

        Self {
            incident_id: alert.id.clone(),
            summary: analysis.summary,
            root_cause: analysis.root_cause,
            proposed_fix: analysis.proposed_fix,
            risk_level: analysis.risk_level,
            estimated_impact: analysis.estimated_impact,
            timestamp,
            metadata,
        }
    }
}

/// Entry kept in `rca-failures`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcaFailure {
    pub alert_id: String,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alert_optional_fields_default() {
        let alert: Alert = serde_json::from_value(json!({
            "id": "alert-1",
            "alertType": "high_memory",
            "severity": "warning",
            "metric": "memory_usage",
            "currentValue": 91,
            "threshold": 85,
            "affectedResource": "api-3"
        }))
        .unwrap();

        assert!(alert.logs.is_empty());
        assert!(alert.metadata.is_empty());
        assert_eq!(alert.to_request().current_value, 91.0);
    }

    #[test]
    fn test_alert_requires_core_fields() {
        let result = serde_json::from_value::<Alert>(json!({
            "id": "alert-2",
            "alertType": "high_memory",
            "severity": "warning"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_record_metadata_merge() {
        let alert: Alert = serde_json::from_value(json!({
            "id": "alert-3",
            "alertType": "disk_full",
            "severity": "critical",
            "metric": "disk_usage",
            "currentValue": 97,
            "threshold": 90,
            "affectedResource": "db-01",
            "metadata": {"diskUsagePercent": 97, "severity": "sev1"}
        }))
        .unwrap();
        let analysis = AnalysisResult {
            summary: "s".to_string(),
            root_cause: "r".to_string(),
            proposed_fix: "p".to_string(),
            risk_level: RiskLevel::High,
            estimated_impact: "i".to_string(),
            raw_response: "model text".to_string(),
        };

        let record = RcaRecord::from_analysis(&alert, analysis, Utc::now());
        let wire = serde_json::to_value(&record).unwrap();

        assert_eq!(wire["incidentId"], "alert-3");
        assert_eq!(wire["riskLevel"], "high");
        assert_eq!(wire["metadata"]["rawLLMResponse"], "model text");
        assert_eq!(wire["metadata"]["diskUsagePercent"], 97);
        assert_eq!(wire["metadata"]["alertType"], "disk_full");
        // alert metadata wins over the generated keys
        assert_eq!(wire["metadata"]["severity"], "sev1");
    }
}
