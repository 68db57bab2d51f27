//! Provider-agnostic message, tool and result types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A message supplied by the caller.
///
/// Serializes to the OpenAI chat shape, which the OpenAI-style adapter
/// forwards verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,

    /// Tool name (for tool results)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Tool call ID (for tool results)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
            tool_call_id: None,
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create a tool result message
    pub fn tool_result(
        name: impl Into<String>,
        call_id: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: result.into(),
            name: Some(name.into()),
            tool_call_id: Some(call_id.into()),
        }
    }
}

/// A callable tool offered to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// JSON Schema describing the arguments
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            parameters,
        }
    }

    pub(crate) fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// JSON-encoded arguments
    pub arguments: String,
}

/// Normalized result of a chat call. Both fields are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResult {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
}

impl ChatResult {
    /// Create a plain text result
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: vec![],
        }
    }

    #[inline]
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_serializes_without_empty_optionals() {
        let msg = ChatMessage::user("hi");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"role": "user", "content": "hi"})
        );
    }

    #[test]
    fn test_tool_result_message() {
        let msg = ChatMessage::tool_result("lookup", "call_1", "{\"ok\":true}");
        assert_eq!(msg.role, Role::Tool);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["tool_call_id"], "call_1");
        assert_eq!(value["name"], "lookup");
    }

    #[test]
    fn test_tool_definition_without_description() {
        let tool = ToolDefinition {
            name: "noop".to_string(),
            description: None,
            parameters: json!({"type": "object"}),
        };
        assert_eq!(tool.description_or_empty(), "");
        let value = serde_json::to_value(&tool).unwrap();
        assert!(value.get("description").is_none());
    }
}
