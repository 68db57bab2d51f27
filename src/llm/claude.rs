//! Anthropic-style chat client (`/messages`).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::{ApiFormat, ProviderConfig};
use crate::message::{ChatMessage, ChatResult, Role, ToolCall, ToolDefinition};
use crate::normalize::split_system_message;
use crate::Result;

use super::types::{ClaudeBlock, ClaudeResponse};
use super::{parse_body, read_success_body, LlmClient};

const PROVIDER: &str = "Claude";

/// Value of the `anthropic-version` header
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const MAX_TOKENS: u32 = 2048;

/// Client for the Anthropic Messages API.
#[derive(Clone)]
pub struct ClaudeClient {
    api_key: String,
    base_url: String,
    model: String,
    client: Client,
}

impl ClaudeClient {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            client,
        }
    }

    fn build_url(&self) -> String {
        format!("{}/messages", self.base_url)
    }

    /// Tool results have no request-side role in this protocol and are dropped.
    fn convert_messages(messages: &[&ChatMessage]) -> Vec<Value> {
        messages
            .iter()
            .filter(|m| m.role != Role::Tool)
            .map(|m| {
                let role = match m.role {
                    Role::Assistant => "assistant",
                    _ => "user",
                };
                json!({"role": role, "content": m.content})
            })
            .collect()
    }

    fn convert_tools(tools: &[ToolDefinition]) -> Vec<Value> {
        tools
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description_or_empty(),
                    "input_schema": t.parameters
                })
            })
            .collect()
    }

    fn build_request(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        tools: &[ToolDefinition],
    ) -> Value {
        let split = split_system_message(messages);

        let mut request = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "temperature": temperature,
            "messages": Self::convert_messages(&split.non_system),
        });

        if !split.system.is_empty() {
            request["system"] = json!(split.system);
        }

        if !tools.is_empty() {
            request["tools"] = Value::Array(Self::convert_tools(tools));
            request["tool_choice"] = json!({"type": "auto"});
        }

        request
    }

    fn parse_response(response: ClaudeResponse) -> ChatResult {
        // Every text block counts, including empty ones
        let text = response
            .content
            .iter()
            .filter_map(|block| match block {
                ClaudeBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();

        let tool_calls = response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ClaudeBlock::ToolUse { id, name, input } => Some(ToolCall {
                    id,
                    name,
                    arguments: input.unwrap_or_else(|| json!({})).to_string(),
                }),
                _ => None,
            })
            .collect();

        ChatResult { text, tool_calls }
    }
}

#[async_trait]
impl LlmClient for ClaudeClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        tools: &[ToolDefinition],
    ) -> Result<ChatResult> {
        let request = self.build_request(messages, temperature, tools);
        tracing::debug!(
            "Claude chat request: model={} messages={} tools={}",
            self.model,
            messages.len(),
            tools.len()
        );

        let response = self
            .client
            .post(self.build_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let body = read_success_body(response, PROVIDER).await?;
        Ok(Self::parse_response(parse_body(&body, PROVIDER)?))
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn format(&self) -> ApiFormat {
        ApiFormat::Claude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn client() -> ClaudeClient {
        ClaudeClient::new(
            Client::new(),
            &ProviderConfig {
                api_key: "sk-ant".to_string(),
                base_url: "https://api.anthropic.com/v1".to_string(),
                model: "claude-test".to_string(),
                format: ApiFormat::Claude,
                vertex: None,
            },
        )
    }

    #[test]
    fn test_system_split_out_of_messages() {
        let messages = vec![
            ChatMessage::system("A"),
            ChatMessage::system("B"),
            ChatMessage::user("hi"),
        ];
        let request = client().build_request(&messages, 0.5, &[]);

        assert_eq!(request["system"], "A\n\nB");
        assert_eq!(request["messages"], json!([{"role": "user", "content": "hi"}]));
        assert_eq!(request["max_tokens"], 2048);
        assert!(request.get("tools").is_none());
        assert!(request.get("tool_choice").is_none());
    }

    #[test]
    fn test_tool_messages_dropped_and_roles_mapped() {
        let messages = vec![
            ChatMessage::user("q"),
            ChatMessage::assistant("a"),
            ChatMessage::tool_result("lookup", "t1", "{}"),
        ];
        let request = client().build_request(&messages, 0.5, &[]);

        assert!(request.get("system").is_none());
        assert_eq!(
            request["messages"],
            json!([
                {"role": "user", "content": "q"},
                {"role": "assistant", "content": "a"}
            ])
        );
    }

    #[test]
    fn test_tools_use_input_schema() {
        let tools = vec![ToolDefinition {
            name: "lookup".to_string(),
            description: None,
            parameters: json!({"type": "object"}),
        }];
        let request = client().build_request(&[ChatMessage::user("q")], 0.5, &tools);

        assert_eq!(
            request["tools"],
            json!([{"name": "lookup", "description": "", "input_schema": {"type": "object"}}])
        );
        assert_eq!(request["tool_choice"], json!({"type": "auto"}));
    }

    #[test]
    fn test_parse_blocks() {
        let body = json!({
            "content": [
                {"type": "text", "text": "first"},
                {"type": "tool_use", "id": "toolu_1", "name": "lookup", "input": {"word": "cat"}},
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "second"}
            ]
        });
        let parsed: ClaudeResponse = parse_body(&body.to_string(), PROVIDER).unwrap();
        let result = ClaudeClient::parse_response(parsed);

        assert_eq!(result.text, "first\nsecond");
        assert_eq!(
            result.tool_calls,
            vec![ToolCall {
                id: "toolu_1".to_string(),
                name: "lookup".to_string(),
                arguments: "{\"word\":\"cat\"}".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_keeps_empty_text_blocks() {
        let body = json!({
            "content": [
                {"type": "text", "text": "a"},
                {"type": "text", "text": ""},
                {"type": "text", "text": "b"}
            ]
        });
        let parsed: ClaudeResponse = parse_body(&body.to_string(), PROVIDER).unwrap();
        let result = ClaudeClient::parse_response(parsed);

        assert_eq!(result.text, "a\n\nb");
        assert!(result.tool_calls.is_empty());
    }

    #[test]
    fn test_parse_missing_content() {
        let err = parse_body::<ClaudeResponse>(r#"{"type": "error"}"#, PROVIDER).unwrap_err();
        assert!(matches!(err, Error::ResponseShape(_)));
    }
}
