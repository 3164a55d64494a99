use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::ValidationReport;

/// Structured event handed to the host alongside a render when tracing is
/// switched on. The core never writes it anywhere itself.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEvent {
    pub name: String,
    #[serde(default)]
    pub properties: Value,
}

pub fn trace_enabled() -> bool {
    std::env::var("ADAPTIVE_CARD_TRACE")
        .map(|v| v == "1")
        .unwrap_or(false)
}

pub fn hash_value(value: &Value) -> Option<String> {
    let bytes = serde_json::to_vec(value).ok()?;
    Some(format!("blake3:{}", blake3::hash(&bytes).to_hex()))
}

pub fn build_render_trace(
    card_hash: Option<String>,
    report: &ValidationReport,
    body_count: usize,
    action_count: usize,
) -> TelemetryEvent {
    let mut properties = Map::new();
    properties.insert(
        "card_hash".to_string(),
        card_hash.map(Value::String).unwrap_or(Value::Null),
    );
    properties.insert(
        "validation".to_string(),
        serde_json::json!({
            "errors": report.errors.len(),
            "warnings": report.warnings.len()
        }),
    );
    properties.insert(
        "rendered".to_string(),
        serde_json::json!({
            "body": body_count,
            "actions": action_count
        }),
    );

    TelemetryEvent {
        name: "adaptive_card.render".to_string(),
        properties: Value::Object(properties),
    }
}
