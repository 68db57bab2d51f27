//! Vertex AI configuration parsing
//!
//! Accepts two shapes of user input:
//! - a wrapper object `{ project_id, location, service_account_json }`
//! - a bare service-account key file (`client_email`, `private_key`, ...)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Region used when the input names none
pub const DEFAULT_LOCATION: &str = "us-central1";

/// Normalized Vertex AI settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexConfig {
    pub enabled: bool,
    pub project_id: String,
    pub location: String,
    /// Raw service-account JSON, parsed only when a token is needed
    pub service_account_json: String,
}

impl VertexConfig {
    /// Cache key for tokens issued to `client_email` for this project/location.
    pub fn cache_key(&self, client_email: &str) -> String {
        format!("{}:{}:{}", client_email, self.project_id, self.location)
    }

    /// Regional host, or `host_override` when one is configured.
    pub fn host(&self, host_override: Option<&str>) -> String {
        match host_override {
            Some(host) => host.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.location),
        }
    }

    /// Publisher-models collection for Google models in this project/location.
    pub fn models_url(&self, host_override: Option<&str>) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models",
            self.host(host_override),
            self.project_id,
            self.location
        )
    }

    pub fn generate_content_url(&self, model: &str, host_override: Option<&str>) -> String {
        format!("{}/{}:generateContent", self.models_url(host_override), model)
    }
}

/// Parse a raw Vertex JSON blob. Returns `None` for malformed or incomplete input.
pub fn parse_vertex_config(raw: &str) -> Option<VertexConfig> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parsed: Value = serde_json::from_str(raw).ok()?;
    let obj = parsed.as_object()?;

    let is_service_account =
        non_empty(obj, "client_email").is_some() && non_empty(obj, "private_key").is_some();

    let service_account_json = if is_service_account {
        parsed.to_string()
    } else {
        match obj.get("service_account_json") {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(v @ Value::Object(_)) => v.to_string(),
            _ => String::new(),
        }
    };

    let project_id = non_empty(obj, "project_id")
        .or_else(|| non_empty(obj, "projectId"))?
        .to_string();
    let location = non_empty(obj, "location")
        .or_else(|| non_empty(obj, "region"))
        .unwrap_or(DEFAULT_LOCATION)
        .to_string();

    if service_account_json.is_empty() {
        return None;
    }

    Some(VertexConfig {
        enabled: obj.get("enabled") != Some(&Value::Bool(false)),
        project_id,
        location,
        service_account_json,
    })
}

/// True when `raw` yields an enabled, usable Vertex config.
pub fn has_usable_vertex_config(raw: &str) -> bool {
    parse_vertex_config(raw).is_some_and(|c| c.enabled)
}

fn non_empty<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
