//! LLM client abstraction layer.
//!
//! This module provides:
//! - [`LlmClient`] trait implemented once per wire protocol
//! - [`ProviderRegistry`] selecting the implementation from [`ApiFormat`]
//! - Concrete implementations: OpenAI-style, Claude-style, Gemini-style
//!   (API key or Vertex AI)
//!
//! # Adding a New Protocol
//!
//! 1. Create a new file (e.g., `cohere.rs`)
//! 2. Implement `LlmClient` trait
//! 3. Add a variant to `ApiFormat` and a branch to `ProviderRegistry::create()`

mod types;

pub mod claude;
pub mod gemini;
pub mod openai;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::auth::VertexAuthenticator;
use crate::config::{ApiFormat, ProviderConfig};
use crate::error::Error;
use crate::message::{ChatMessage, ChatResult, ToolDefinition};
use crate::Result;

pub use claude::ClaudeClient;
pub use gemini::{GeminiAuth, GeminiClient};
pub use openai::OpenAiClient;

/// LLM client trait — one implementation per wire protocol.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one chat request and normalize the response.
    ///
    /// `tools` may be empty, in which case no tool keys are sent.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        tools: &[ToolDefinition],
    ) -> Result<ChatResult>;

    /// Model this client sends requests to.
    fn model(&self) -> &str;

    fn format(&self) -> ApiFormat;
}

/// Provider registry — creates LLM clients from a resolved config.
///
/// # Example
///
/// ```ignore
/// let client = ProviderRegistry::create(&config, &http, &authenticator, None)?;
/// let result = client.chat(&messages, 0.7, &[]).await?;
/// ```
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Create an LLM client for `config.format`.
    ///
    /// `vertex_host` replaces the regional Vertex AI host when set.
    pub fn create(
        config: &ProviderConfig,
        http: &Client,
        authenticator: &VertexAuthenticator,
        vertex_host: Option<&str>,
    ) -> Result<Box<dyn LlmClient>> {
        let vertex = config.active_vertex();
        if config.api_key.is_empty() && vertex.is_none() {
            return Err(Error::Config(format!(
                "No credentials available for {} format",
                config.format
            )));
        }

        match config.format {
            ApiFormat::OpenAi => Ok(Box::new(OpenAiClient::new(http.clone(), config))),
            ApiFormat::Claude => Ok(Box::new(ClaudeClient::new(http.clone(), config))),
            ApiFormat::Gemini => {
                let auth = match vertex {
                    Some(vertex) => GeminiAuth::Vertex {
                        config: vertex.clone(),
                        authenticator: authenticator.clone(),
                        host: vertex_host.map(str::to_string),
                    },
                    None => GeminiAuth::ApiKey(config.api_key.clone()),
                };
                Ok(Box::new(GeminiClient::new(http.clone(), config, auth)))
            }
        }
    }
}

/// Read the body of a successful response, or turn a non-2xx status into
/// [`Error::ProviderHttp`].
pub(crate) async fn read_success_body(response: Response, provider: &'static str) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::warn!("{} API returned {}", provider, status);
        return Err(Error::ProviderHttp {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

/// Deserialize a response body, reporting mismatches as [`Error::ResponseShape`].
pub(crate) fn parse_body<T: DeserializeOwned>(body: &str, provider: &'static str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| Error::ResponseShape(format!("{provider} response: {e}")))
}
