//! Model catalog: lists the models a configured provider offers.
//!
//! Shares credentials with chat but none of its request path.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth::VertexAuthenticator;
use crate::config::{ApiFormat, ProviderConfig};
use crate::llm::claude::ANTHROPIC_VERSION;
use crate::llm::{parse_body, read_success_body};
use crate::Result;

/// One entry of a provider's model list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_by: Option<String>,
}

impl ModelInfo {
    fn new(id: impl Into<String>, owned_by: Option<&str>) -> Self {
        Self {
            id: id.into(),
            owned_by: owned_by.map(str::to_string),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DataList {
    #[serde(default)]
    data: Vec<DataEntry>,
}

#[derive(Debug, Deserialize)]
struct DataEntry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    owned_by: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiModelList {
    #[serde(default)]
    models: Vec<NamedModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublisherModelList {
    #[serde(default)]
    publisher_models: Vec<NamedModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NamedModel {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version_id: Option<String>,
}

/// Fetch the model list for `config`, without empty ids and sorted by id.
pub async fn fetch_models(
    config: &ProviderConfig,
    http: &Client,
    authenticator: &VertexAuthenticator,
    vertex_host: Option<&str>,
) -> Result<Vec<ModelInfo>> {
    let provider = config.format.provider_name();

    let mut models = match config.format {
        ApiFormat::OpenAi => {
            let response = http
                .get(format!("{}/models", config.base_url))
                .bearer_auth(&config.api_key)
                .send()
                .await?;
            let list: DataList = parse(response, provider).await?;
            list.data
                .into_iter()
                .map(|m| ModelInfo {
                    id: m.id,
                    owned_by: m.owned_by,
                })
                .collect::<Vec<_>>()
        }
        ApiFormat::Claude => {
            let response = http
                .get(format!("{}/models", config.base_url))
                .header("x-api-key", &config.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .send()
                .await?;
            let list: DataList = parse(response, provider).await?;
            list.data
                .into_iter()
                .map(|m| ModelInfo::new(m.id, Some("anthropic")))
                .collect()
        }
        ApiFormat::Gemini => match config.active_vertex() {
            Some(vertex) => {
                let token = authenticator.get_access_token(vertex).await?;
                let response = http
                    .get(vertex.models_url(vertex_host))
                    .bearer_auth(token)
                    .send()
                    .await?;
                let list: PublisherModelList = parse(response, provider).await?;
                list.publisher_models
                    .into_iter()
                    .map(|m| ModelInfo::new(vertex_model_id(m), Some("google-vertex")))
                    .collect()
            }
            None => {
                let response = http
                    .get(format!("{}/models", config.base_url))
                    .query(&[("key", config.api_key.as_str())])
                    .send()
                    .await?;
                let list: GeminiModelList = parse(response, provider).await?;
                list.models
                    .into_iter()
                    .map(|m| {
                        let id = m.name.strip_prefix("models/").unwrap_or(&m.name).to_string();
                        ModelInfo::new(id, Some("google"))
                    })
                    .collect()
            }
        },
    };

    models.retain(|m| !m.id.is_empty());
    models.sort_by(|a, b| a.id.cmp(&b.id));
    tracing::debug!("{} models listed for {}", models.len(), config.format);
    Ok(models)
}

/// Last path segment of `publishers/google/models/<id>`, else the version id.
fn vertex_model_id(model: NamedModel) -> String {
    match model.name.rsplit('/').next() {
        Some(last) if !last.is_empty() => last.to_string(),
        _ => model.version_id.unwrap_or_default(),
    }
}

async fn parse<T: DeserializeOwned>(response: Response, provider: &'static str) -> Result<T> {
    let body = read_success_body(response, provider).await?;
    parse_body(&body, provider)
}
