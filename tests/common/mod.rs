#![allow(dead_code)]

use std::sync::Arc;

use llm_gateway::auth::TokenCache;
use llm_gateway::{Gateway, Profile, ProviderConfig};
use serde_json::json;

pub const TEST_KEY: &str = include_str!("../fixtures/service_account_key.pem");
pub const CLIENT_EMAIL: &str = "svc@proj-1.iam.gserviceaccount.com";

/// Gateway with an isolated token cache, pointing Vertex traffic at `host`.
pub fn isolated_gateway(host: &str) -> Gateway {
    Gateway::with_token_cache(Arc::new(TokenCache::new())).with_vertex_host(host)
}

pub fn api_key_config(format: &str, base_url: &str, model: &str) -> ProviderConfig {
    ProviderConfig::resolve(&Profile {
        ai_api_key: Some("sk-x".to_string()),
        ai_base_url: Some(base_url.to_string()),
        ai_model: Some(model.to_string()),
        ai_api_format: Some(format.to_string()),
        ai_vertex_config: None,
    })
    .unwrap()
}

/// Gemini config authenticated with a service account whose token endpoint is `token_uri`.
pub fn vertex_config(token_uri: &str, model: &str) -> ProviderConfig {
    let wrapper = json!({
        "project_id": "proj-1",
        "location": "us-central1",
        "service_account_json": {
            "type": "service_account",
            "client_email": CLIENT_EMAIL,
            "private_key": TEST_KEY,
            "token_uri": token_uri,
        }
    });

    ProviderConfig::resolve(&Profile {
        ai_model: Some(model.to_string()),
        ai_api_format: Some("gemini".to_string()),
        ai_vertex_config: Some(wrapper.to_string()),
        ..Default::default()
    })
    .unwrap()
}
