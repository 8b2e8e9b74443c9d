//! Risk taxonomy and the normalization rule shared by every resolution path

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ratio of current value to threshold at which an alert is always high risk
pub const ESCALATION_FACTOR: f64 = 1.5;

const HIGH_TERMS: &[&str] = &["critical", "high", "severe"];
const MEDIUM_TERMS: &[&str] = &["medium", "moderate", "warn", "warning"];
const LOW_TERMS: &[&str] = &["low", "info", "minor"];

/// Three-valued risk rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Fixed impact statement for this risk level
    pub fn impact(&self) -> &'static str {
        match self {
            RiskLevel::High => "High risk of service degradation or outage if not mitigated.",
            RiskLevel::Low => {
                "Limited impact expected; monitor and address during normal operations."
            }
            RiskLevel::Medium => "Moderate impact possible; mitigate promptly to avoid escalation.",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify free-text risk wording.
///
/// The candidate is used when non-blank, otherwise the fallback severity.
/// Terms are matched as substrings, high before medium before low; anything
/// unrecognised is medium.
pub fn normalize_risk_level(candidate: &str, fallback_severity: &str) -> RiskLevel {
    let mut raw = candidate.trim().to_lowercase();
    if raw.is_empty() {
        raw = fallback_severity.trim().to_lowercase();
    }

    let contains_any = |terms: &[&str]| terms.iter().any(|term| raw.contains(term));

    if contains_any(HIGH_TERMS) {
        RiskLevel::High
    } else if contains_any(MEDIUM_TERMS) {
        RiskLevel::Medium
    } else if contains_any(LOW_TERMS) {
        RiskLevel::Low
    } else {
        RiskLevel::Medium
    }
}

/// True when the observed value is at least 1.5x a non-zero threshold
pub fn exceeds_escalation(current_value: f64, threshold: f64) -> bool {
    threshold != 0.0 && current_value >= threshold * ESCALATION_FACTOR
}

/// Severity-derived risk with magnitude escalation
pub fn risk_from_severity(severity: &str, current_value: f64, threshold: f64) -> RiskLevel {
    if exceeds_escalation(current_value, threshold) {
        RiskLevel::High
    } else {
        normalize_risk_level(severity, severity)
    }
}

/// Impact statement keyed by risk level
pub fn impact_from_risk(risk_level: RiskLevel) -> &'static str {
    risk_level.impact()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_priority() {
        assert_eq!(normalize_risk_level("Critical Severity", "low"), RiskLevel::High);
        assert_eq!(normalize_risk_level("", "warning"), RiskLevel::Medium);
        assert_eq!(normalize_risk_level("", ""), RiskLevel::Medium);
        assert_eq!(normalize_risk_level("minor issue", "critical"), RiskLevel::Low);
        assert_eq!(normalize_risk_level("  ", "INFO"), RiskLevel::Low);
        assert_eq!(normalize_risk_level("unknown", "critical"), RiskLevel::Medium);
        // "high" wins over "low" when both appear
        assert_eq!(normalize_risk_level("low to high", ""), RiskLevel::High);
    }

    #[test]
    fn test_escalation() {
        assert_eq!(risk_from_severity("low", 160.0, 100.0), RiskLevel::High);
        assert_eq!(risk_from_severity("low", 150.0, 100.0), RiskLevel::High);
        assert_eq!(risk_from_severity("low", 149.9, 100.0), RiskLevel::Low);
        assert_eq!(risk_from_severity("info", 10.0, 0.0), RiskLevel::Low);
        assert_eq!(risk_from_severity("critical", 1.0, 100.0), RiskLevel::High);
    }

    #[test]
    fn test_display_and_wire_name() {
        assert_eq!(RiskLevel::Low.to_string(), "low");
        assert_eq!(serde_json::to_value(RiskLevel::Medium).unwrap(), "medium");
    }

    #[test]
    fn test_impact_table() {
        assert!(impact_from_risk(RiskLevel::High).starts_with("High risk"));
        assert!(impact_from_risk(RiskLevel::Low).starts_with("Limited impact"));
        assert!(impact_from_risk(RiskLevel::Medium).starts_with("Moderate impact"));
    }
}
