//! Prompt construction for the advice source

use serde::Serialize;
use serde_json::{Map, Value};

use super::types::AnalysisRequest;
use crate::services::openrouter::{ChatCompletionRequest, ChatMessage};

/// Low temperature keeps the model on literal JSON instead of prose
pub const TEMPERATURE: f32 = 0.2;

pub const SYSTEM_PROMPT: &str = "You are an SRE assistant. Return ONLY valid JSON with keys: \
summary, root_cause, proposed_fix, risk_level, estimated_impact. \
risk_level must be one of: low, medium, high. \
Keep summary under 2 sentences. Do not use markdown.";

const USER_PREAMBLE: &str = "Analyze the alert and provide a concise RCA.";

/// Alert data as the model sees it
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AlertData<'a> {
    alert_type: &'a str,
    severity: &'a str,
    metric: &'a str,
    current_value: f64,
    threshold: f64,
    affected_resource: &'a str,
    logs: &'a [String],
    metadata: &'a Map<String, Value>,
}

impl<'a> From<&'a AnalysisRequest> for AlertData<'a> {
    fn from(request: &'a AnalysisRequest) -> Self {
        Self {
            alert_type: &request.alert_type,
            severity: &request.severity,
            metric: &request.metric,
            current_value: request.current_value,
            threshold: request.threshold,
            affected_resource: &request.affected_resource,
            logs: &request.logs,
            metadata: &request.metadata,
        }
    }
}

/// Render the user instruction with the alert embedded as one JSON blob
pub fn build_user_prompt(request: &AnalysisRequest) -> String {
    // Non-finite floats serialize as null rather than failing
    let alert_data = serde_json::to_string(&AlertData::from(request))
        .unwrap_or_else(|_| "{}".to_string());
    format!("{}\nAlert data: {}", USER_PREAMBLE, alert_data)
}

/// Build the chat-completion payload for one analysis
pub fn build_payload(request: &AnalysisRequest, model: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        temperature: TEMPERATURE,
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_user_prompt(request)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::openrouter::Role;
    use serde_json::json;

    fn sample_request() -> AnalysisRequest {
        let mut metadata = Map::new();
        metadata.insert("service".to_string(), json!("checkout"));
        AnalysisRequest::new("disk_full", "critical", "disk_usage", 97.5, 90.0, "db-01")
            .with_logs(["ENOSPC on /var/lib/postgres"])
            .with_metadata(metadata)
    }

    #[test]
    fn test_payload_shape() {
        let payload = build_payload(&sample_request(), "deepseek/deepseek-r1");

        assert_eq!(payload.model, "deepseek/deepseek-r1");
        assert_eq!(payload.temperature, TEMPERATURE);
        assert_eq!(payload.messages.len(), 2);
        assert_eq!(payload.messages[0].role, Role::System);
        assert_eq!(payload.messages[1].role, Role::User);

        let system = &payload.messages[0].content;
        for key in ["summary", "root_cause", "proposed_fix", "risk_level", "estimated_impact"] {
            assert!(system.contains(key), "system prompt is missing {}", key);
        }
        assert!(system.contains("low, medium, high"));
        assert!(system.contains("Do not use markdown"));
    }

    #[test]
    fn test_user_prompt_embeds_alert_json() {
        let prompt = build_user_prompt(&sample_request());
        let (preamble, blob) = prompt.split_once("\nAlert data: ").unwrap();
        assert_eq!(preamble, USER_PREAMBLE);

        let data: Value = serde_json::from_str(blob).unwrap();
        assert_eq!(data["alertType"], "disk_full");
        assert_eq!(data["currentValue"], 97.5);
        assert_eq!(data["affectedResource"], "db-01");
        assert_eq!(data["logs"][0], "ENOSPC on /var/lib/postgres");
        assert_eq!(data["metadata"]["service"], "checkout");
    }
}
