//! OpenAI-style chat client (`/chat/completions`).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::{ApiFormat, ProviderConfig};
use crate::error::Error;
use crate::message::{ChatMessage, ChatResult, ToolCall, ToolDefinition};
use crate::Result;

use super::types::OpenAiResponse;
use super::{parse_body, read_success_body, LlmClient};

const PROVIDER: &str = "OpenAI";

/// Client for OpenAI and OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    model: String,
    client: Client,
}

impl OpenAiClient {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            client,
        }
    }

    fn build_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Messages are forwarded verbatim; `tools` and `tool_choice` only
    /// appear when tools are offered.
    fn build_request(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        tools: &[ToolDefinition],
    ) -> Value {
        let mut request = json!({
            "model": self.model,
            "messages": messages,
            "temperature": temperature,
        });

        if !tools.is_empty() {
            let tools: Vec<Value> = tools
                .iter()
                .map(|t| json!({"type": "function", "function": t}))
                .collect();
            request["tools"] = Value::Array(tools);
            request["tool_choice"] = json!("auto");
        }

        request
    }

    fn parse_response(response: OpenAiResponse) -> Result<ChatResult> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::ResponseShape("No choices in OpenAI response".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCall {
                id: call.id,
                name: call.function.name.unwrap_or_default(),
                arguments: call.function.arguments.unwrap_or_else(|| "{}".to_string()),
            })
            .collect();

        Ok(ChatResult {
            text: choice.message.content.unwrap_or_default(),
            tool_calls,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        tools: &[ToolDefinition],
    ) -> Result<ChatResult> {
        let request = self.build_request(messages, temperature, tools);
        tracing::debug!(
            "OpenAI chat request: model={} messages={} tools={}",
            self.model,
            messages.len(),
            tools.len()
        );

        let response = self
            .client
            .post(self.build_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let body = read_success_body(response, PROVIDER).await?;
        Self::parse_response(parse_body(&body, PROVIDER)?)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn format(&self) -> ApiFormat {
        ApiFormat::OpenAi
    }
}
