mod common;

use llm_gateway::{Error, ModelInfo};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{api_key_config, isolated_gateway, vertex_config};

fn ids(models: &[ModelInfo]) -> Vec<&str> {
    models.iter().map(|m| m.id.as_str()).collect()
}

#[tokio::test]
async fn openai_models_sorted_without_empty_ids() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("authorization", "Bearer sk-x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [
                {"id": "gpt-4o", "owned_by": "openai"},
                {"id": "", "owned_by": "nobody"},
                {"id": "Gpt-legacy", "owned_by": "openai"},
                {"id": "babbage-002", "owned_by": "system"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = api_key_config("openai", &format!("{}/v1", server.uri()), "gpt-test");
    let models = isolated_gateway(&server.uri())
        .fetch_models(&config)
        .await
        .unwrap();

    // Ordinal comparison: uppercase sorts before lowercase
    assert_eq!(ids(&models), vec!["Gpt-legacy", "babbage-002", "gpt-4o"]);
    assert_eq!(models[1].owned_by.as_deref(), Some("system"));
}

#[tokio::test]
async fn claude_models_owned_by_anthropic() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("x-api-key", "sk-x"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "claude-sonnet", "type": "model"},
                {"id": "claude-haiku", "type": "model"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = api_key_config("claude", &format!("{}/v1", server.uri()), "claude-test");
    let models = isolated_gateway(&server.uri())
        .fetch_models(&config)
        .await
        .unwrap();

    assert_eq!(ids(&models), vec!["claude-haiku", "claude-sonnet"]);
    assert!(models
        .iter()
        .all(|m| m.owned_by.as_deref() == Some("anthropic")));
}

#[tokio::test]
async fn gemini_public_models_strip_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(query_param("key", "sk-x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                {"name": "models/gemini-2.0-flash"},
                {"name": "models/embedding-001"},
                {"name": "models/"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = api_key_config("gemini", &format!("{}/v1beta", server.uri()), "gemini-test");
    let models = isolated_gateway(&server.uri())
        .fetch_models(&config)
        .await
        .unwrap();

    assert_eq!(ids(&models), vec!["embedding-001", "gemini-2.0-flash"]);
    assert_eq!(models[0].owned_by.as_deref(), Some("google"));
}

#[tokio::test]
async fn vertex_models_use_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "expires_in": 3599
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(
            "/v1/projects/proj-1/locations/us-central1/publishers/google/models",
        ))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "publisherModels": [
                {"name": "publishers/google/models/gemini-2.0-flash"},
                {"name": "publishers/google/models/gemini-1.5-pro", "versionId": "002"},
                {"versionId": "001"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = vertex_config(&format!("{}/token", server.uri()), "gemini-test");
    let models = isolated_gateway(&server.uri())
        .fetch_models(&config)
        .await
        .unwrap();

    assert_eq!(ids(&models), vec!["001", "gemini-1.5-pro", "gemini-2.0-flash"]);
    assert_eq!(models[0].owned_by.as_deref(), Some("google-vertex"));
}

#[tokio::test]
async fn listing_failure_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let config = api_key_config("openai", &format!("{}/v1", server.uri()), "gpt-test");
    let err = isolated_gateway(&server.uri())
        .fetch_models(&config)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ProviderHttp { status: 401, .. }));
}
