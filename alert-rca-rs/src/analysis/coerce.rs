//! Coercion of loosely shaped model output onto the canonical result fields
//!
//! Models drift between snake_case, camelCase and synonyms. Each canonical
//! field lists the keys it accepts, in lookup order.

use serde_json::{Map, Value};

use super::risk::{normalize_risk_level, risk_from_severity};
use super::types::{AnalysisRequest, AnalysisResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Summary,
    RootCause,
    ProposedFix,
    RiskLevel,
    EstimatedImpact,
}

/// Canonical field → accepted source keys
pub const FIELD_ALIASES: &[(CanonicalField, &[&str])] = &[
    (CanonicalField::Summary, &["summary"]),
    (CanonicalField::RootCause, &["root_cause", "rootCause", "cause"]),
    (
        CanonicalField::ProposedFix,
        &["proposed_fix", "proposedFix", "recommended_action", "recommendedAction"],
    ),
    (CanonicalField::RiskLevel, &["risk_level", "riskLevel", "risk"]),
    (
        CanonicalField::EstimatedImpact,
        &["estimated_impact", "estimatedImpact", "impact"],
    ),
];

pub const DEFAULT_SUMMARY: &str =
    "Alert requires investigation; automated analysis returned no summary.";
pub const DEFAULT_ROOT_CAUSE: &str =
    "Likely resource or dependency issue; additional investigation needed.";
pub const DEFAULT_PROPOSED_FIX: &str = "Inspect recent changes, logs, and resource utilization.";

impl CanonicalField {
    pub fn aliases(self) -> &'static [&'static str] {
        FIELD_ALIASES
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, keys)| *keys)
            .unwrap_or(&[])
    }
}

/// Render a JSON value as trimmed text; null becomes the empty string
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Values an alias chain skips over: null, `false`, zero, blank text and empty containers
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// First non-blank value among the field's aliases, as text (empty if none)
pub fn resolve_field(data: &Map<String, Value>, field: CanonicalField) -> String {
    field
        .aliases()
        .iter()
        .filter_map(|key| data.get(*key))
        .find(|value| !is_blank(value))
        .map(coerce_string)
        .unwrap_or_default()
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Map a parsed model object onto an `AnalysisResult`.
///
/// A risk level supplied by the model is normalized but never escalated; when
/// the model omits it, the severity-derived risk with magnitude escalation is
/// used instead.
pub fn coerce_analysis(
    data: &Map<String, Value>,
    request: &AnalysisRequest,
    raw_response: impl Into<String>,
) -> AnalysisResult {
    let risk_candidate = resolve_field(data, CanonicalField::RiskLevel);
    let risk_level = if risk_candidate.is_empty() {
        risk_from_severity(&request.severity, request.current_value, request.threshold)
    } else {
        normalize_risk_level(&risk_candidate, &request.severity)
    };

    let estimated_impact = or_default(
        resolve_field(data, CanonicalField::EstimatedImpact),
        risk_level.impact(),
    );

    AnalysisResult {
        summary: or_default(resolve_field(data, CanonicalField::Summary), DEFAULT_SUMMARY),
        root_cause: or_default(resolve_field(data, CanonicalField::RootCause), DEFAULT_ROOT_CAUSE),
        proposed_fix: or_default(
            resolve_field(data, CanonicalField::ProposedFix),
            DEFAULT_PROPOSED_FIX,
        ),
        risk_level,
        estimated_impact,
        raw_response: raw_response.into(),
    }
}
