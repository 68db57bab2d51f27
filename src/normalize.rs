//! Helpers shared by the protocol adapters.

use serde_json::Value;

use crate::message::{ChatMessage, Role};
use crate::Result;

/// System text pulled out of a message list, plus everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitMessages<'a> {
    /// All system contents joined by a blank line, trimmed. Empty when none.
    pub system: String,
    pub non_system: Vec<&'a ChatMessage>,
}

/// Separates system-role content from the rest of the conversation,
/// preserving the original order of both.
pub fn split_system_message(messages: &[ChatMessage]) -> SplitMessages<'_> {
    let system = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string();

    let non_system = messages.iter().filter(|m| m.role != Role::System).collect();

    SplitMessages { system, non_system }
}

/// Joins the non-empty `text` fields of response parts with newlines.
pub fn join_text_parts<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    parts
        .into_iter()
        .flatten()
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Parses a model reply that is expected to hold JSON, tolerating a
/// surrounding ```json fence.
pub fn parse_json_reply(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    let without_open = match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("```json") => &trimmed[7..],
        _ => trimmed,
    };
    let cleaned = without_open
        .trim_start()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim();
    Ok(serde_json::from_str(cleaned)?)
}
