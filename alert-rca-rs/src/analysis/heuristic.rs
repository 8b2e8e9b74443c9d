//! Deterministic keyword-driven fallback analysis

use super::risk::risk_from_severity;
use super::types::{AnalysisRequest, AnalysisResult};

/// One classification rule: any keyword match selects the narrative and remedy
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub root_cause: &'static str,
    pub proposed_fix: &'static str,
}

impl KeywordRule {
    fn matches(&self, haystack: &str) -> bool {
        self.keywords.iter().any(|keyword| haystack.contains(keyword))
    }
}

/// Rules in precedence order; the first match wins
pub const RULES: &[KeywordRule] = &[
    KeywordRule {
        name: "disk",
        keywords: &["disk", "storage"],
        root_cause: "Disk usage exceeded threshold, likely from logs or temp files.",
        proposed_fix: "Clean up logs/temp files and verify disk growth or expansion.",
    },
    KeywordRule {
        name: "cpu",
        keywords: &["cpu"],
        root_cause: "CPU saturation likely due to load spike or runaway process.",
        proposed_fix: "Scale up, restart hot processes, and review recent deployments.",
    },
    KeywordRule {
        name: "memory",
        keywords: &["memory", "ram"],
        root_cause: "Memory pressure likely from a leak or increased workload.",
        proposed_fix: "Restart the service and review memory usage trends.",
    },
    KeywordRule {
        name: "network",
        keywords: &["latency", "network"],
        root_cause: "High latency indicates network congestion or dependency slowness.",
        proposed_fix: "Check upstream dependencies and network throughput/errors.",
    },
    KeywordRule {
        name: "instability",
        keywords: &["container", "pod", "service down"],
        root_cause: "Service or container instability detected.",
        proposed_fix: "Restart the service and review crash logs.",
    },
];

/// Catch-all when no rule matches
pub const GENERIC_RULE: KeywordRule = KeywordRule {
    name: "generic",
    keywords: &[],
    root_cause: "Anomalous metric exceeded threshold; likely resource or dependency issue.",
    proposed_fix: "Inspect logs, recent changes, and resource utilization.",
};

/// Lower-cased, space-joined non-empty classification inputs
fn classification_text(request: &AnalysisRequest) -> String {
    let service = request.service().unwrap_or_default();
    [
        request.alert_type.as_str(),
        request.metric.as_str(),
        request.affected_resource.as_str(),
        service.as_str(),
    ]
    .iter()
    .filter(|part| !part.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

/// Pick the first matching rule for a request
pub fn classify(request: &AnalysisRequest) -> &'static KeywordRule {
    let text = classification_text(request);
    RULES
        .iter()
        .find(|rule| rule.matches(&text))
        .unwrap_or(&GENERIC_RULE)
}

/// Build the fallback result. `diagnostic` explains why the advice path was skipped.
pub fn heuristic_analysis(
    request: &AnalysisRequest,
    diagnostic: impl Into<String>,
) -> AnalysisResult {
    let rule = classify(request);
    let risk_level =
        risk_from_severity(&request.severity, request.current_value, request.threshold);

    AnalysisResult {
        summary: format!(
            "{} on {}: {}={} exceeds threshold {}.",
            request.alert_type,
            request.affected_resource,
            request.metric,
            request.current_value,
            request.threshold
        ),
        root_cause: rule.root_cause.to_string(),
        proposed_fix: rule.proposed_fix.to_string(),
        risk_level,
        estimated_impact: risk_level.impact().to_string(),
        raw_response: diagnostic.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::risk::RiskLevel;
    use serde_json::{json, Map};

    fn request(alert_type: &str, metric: &str, resource: &str) -> AnalysisRequest {
        AnalysisRequest::new(alert_type, "warning", metric, 95.0, 80.0, resource)
    }

    #[test]
    fn test_rule_precedence() {
        assert_eq!(classify(&request("disk_full", "disk_usage", "db-01")).name, "disk");
        // disk outranks cpu when both appear
        assert_eq!(classify(&request("cpu_spike", "storage_iops", "db-01")).name, "disk");
        assert_eq!(classify(&request("cpu_spike", "cpu_usage", "web-01")).name, "cpu");
        assert_eq!(classify(&request("high_memory", "rss", "api")).name, "memory");
        assert_eq!(classify(&request("network_latency", "p99_ms", "lb")).name, "network");
        assert_eq!(classify(&request("container_down", "restarts", "api")).name, "instability");
        assert_eq!(classify(&request("Service Down", "up", "api")).name, "instability");
        assert_eq!(classify(&request("error_rate", "5xx", "gateway")).name, "generic");
    }

    #[test]
    fn test_metadata_service_participates() {
        let mut metadata = Map::new();
        metadata.insert("service".to_string(), json!("object-storage"));
        let req = request("threshold_breach", "errors", "node-7").with_metadata(metadata);

        assert_eq!(classify(&req).name, "disk");
    }

    #[test]
    fn test_summary_and_risk() {
        let req = AnalysisRequest::new("cpu_spike", "warning", "cpu_usage", 95.0, 80.0, "web-01");
        let result = heuristic_analysis(&req, "OPENROUTER_API_KEY not set");

        assert_eq!(result.summary, "cpu_spike on web-01: cpu_usage=95 exceeds threshold 80.");
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_eq!(result.estimated_impact, RiskLevel::Medium.impact());
        assert_eq!(result.raw_response, "OPENROUTER_API_KEY not set");
    }

    #[test]
    fn test_escalation_overrides_low_severity() {
        let req = AnalysisRequest::new("queue_depth", "low", "messages", 160.0, 100.0, "broker");
        let result = heuristic_analysis(&req, "");

        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.root_cause, GENERIC_RULE.root_cause);
    }

    #[test]
    fn test_fractional_values_in_summary() {
        let req = AnalysisRequest::new("disk_full", "critical", "disk_usage", 97.5, 90.0, "db-01");
        assert_eq!(
            heuristic_analysis(&req, "").summary,
            "disk_full on db-01: disk_usage=97.5 exceeds threshold 90."
        );
    }
}
