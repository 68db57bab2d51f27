//! Gemini LLM client implementation (API key or Vertex AI authentication).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

use crate::auth::{VertexAuthenticator, VertexConfig};
use crate::config::{ApiFormat, ProviderConfig};
use crate::error::Error;
use crate::message::{ChatMessage, ChatResult, Role, ToolCall, ToolDefinition};
use crate::normalize::{join_text_parts, split_system_message};
use crate::Result;

use super::types::GeminiResponse;
use super::{parse_body, read_success_body, LlmClient};

const PROVIDER: &str = "Gemini";

/// How a Gemini request is authenticated.
#[derive(Clone)]
pub enum GeminiAuth {
    /// Public Generative Language API with `?key=`
    ApiKey(String),
    /// Vertex AI with a service-account bearer token
    Vertex {
        config: VertexConfig,
        authenticator: VertexAuthenticator,
        /// Replaces the regional host when set
        host: Option<String>,
    },
}

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    auth: GeminiAuth,
    client: Client,
}

impl GeminiClient {
    pub fn new(client: Client, config: &ProviderConfig, auth: GeminiAuth) -> Self {
        Self {
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            auth,
            client,
        }
    }

    fn build_url(&self, api_key: &str) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        ))
        .map_err(|e| Error::Config(format!("Invalid Gemini base URL: {e}")))?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(url)
    }

    fn convert_messages(messages: &[&ChatMessage]) -> Vec<Value> {
        messages
            .iter()
            .map(|m| match m.role {
                Role::Assistant => json!({
                    "role": "model",
                    "parts": [{"text": m.content}]
                }),
                Role::Tool => json!({
                    "role": "user",
                    "parts": [{
                        "functionResponse": {
                            "name": m.name.as_deref().unwrap_or("tool"),
                            "response": function_response_payload(&m.content)
                        }
                    }]
                }),
                _ => json!({
                    "role": "user",
                    "parts": [{"text": m.content}]
                }),
            })
            .collect()
    }

    fn convert_tools(tools: &[ToolDefinition]) -> Option<Value> {
        if tools.is_empty() {
            return None;
        }

        let function_declarations: Vec<Value> = tools
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description_or_empty(),
                    "parameters": t.parameters
                })
            })
            .collect();

        Some(json!([{
            "functionDeclarations": function_declarations
        }]))
    }

    fn build_request(messages: &[ChatMessage], temperature: f64, tools: &[ToolDefinition]) -> Value {
        let split = split_system_message(messages);

        let mut request = json!({
            "contents": Self::convert_messages(&split.non_system),
            "generationConfig": {
                "temperature": temperature
            }
        });

        if !split.system.is_empty() {
            request["systemInstruction"] = json!({
                "parts": [{"text": split.system}]
            });
        }

        if let Some(tool_config) = Self::convert_tools(tools) {
            request["tools"] = tool_config;
        }

        request
    }

    /// Function calls carry no id on most API versions, so one is derived
    /// from the part's position.
    fn parse_response(response: GeminiResponse) -> Result<ChatResult> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::ResponseShape("No candidates in Gemini response".to_string()))?;

        let content = candidate.content.ok_or_else(|| {
            Error::ResponseShape(format!(
                "Gemini candidate has no content (finishReason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ))
        })?;

        let text = join_text_parts(content.parts.iter().map(|p| p.text.as_deref()));

        let tool_calls = content
            .parts
            .into_iter()
            .enumerate()
            .filter_map(|(index, part)| {
                part.function_call.map(|fc| ToolCall {
                    id: fc
                        .id
                        .filter(|id| !id.is_empty())
                        .unwrap_or_else(|| format!("gemini-tool-{index}")),
                    name: fc.name,
                    arguments: fc.args.unwrap_or_else(|| json!({})).to_string(),
                })
            })
            .collect();

        Ok(ChatResult { text, tool_calls })
    }
}

/// Tool output as a `functionResponse.response` object: the content itself
/// when it is a JSON object, otherwise wrapped as `{"content": ...}`.
fn function_response_payload(content: &str) -> Value {
    match serde_json::from_str::<Value>(content) {
        Ok(value @ Value::Object(_)) => value,
        _ => json!({"content": content}),
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        tools: &[ToolDefinition],
    ) -> Result<ChatResult> {
        let request = Self::build_request(messages, temperature, tools);

        let http_request = match &self.auth {
            GeminiAuth::ApiKey(api_key) => {
                tracing::debug!("Gemini chat request: model={}", self.model);
                self.client.post(self.build_url(api_key)?)
            }
            GeminiAuth::Vertex {
                config,
                authenticator,
                host,
            } => {
                let access_token = authenticator.get_access_token(config).await?;
                tracing::debug!(
                    "Vertex Gemini chat request: project={} location={} model={}",
                    config.project_id,
                    config.location,
                    self.model
                );
                self.client
                    .post(config.generate_content_url(&self.model, host.as_deref()))
                    .bearer_auth(access_token)
            }
        };

        let response = http_request.json(&request).send().await?;
        let body = read_success_body(response, PROVIDER).await?;
        Self::parse_response(parse_body(&body, PROVIDER)?)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn format(&self) -> ApiFormat {
        ApiFormat::Gemini
    }
}
