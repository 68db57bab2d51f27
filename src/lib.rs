//! llm-gateway - multi-provider language-model gateway
//!
//! This library turns a provider-agnostic chat request into an OpenAI,
//! Claude or Gemini (API key or Vertex AI) call and normalizes the reply
//! into a [`ChatResult`].

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod llm;
pub mod message;
pub mod normalize;
pub mod ui;

pub use catalog::ModelInfo;
pub use config::{ApiFormat, Profile, ProviderConfig};
pub use error::{Error, Result};
pub use gateway::Gateway;
pub use message::{ChatMessage, ChatResult, Role, ToolCall, ToolDefinition};
