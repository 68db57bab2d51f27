//! Entry points used by the rest of the application.

use std::sync::Arc;

use reqwest::Client;

use crate::auth::{TokenCache, VertexAuthenticator};
use crate::catalog::{self, ModelInfo};
use crate::config::ProviderConfig;
use crate::llm::{LlmClient, ProviderRegistry};
use crate::message::{ChatMessage, ChatResult, ToolDefinition};
use crate::Result;

/// Default sampling temperature for [`Gateway::chat`] callers that have no preference
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Provider-agnostic chat and model-listing operations.
///
/// Cloning is cheap; clones share the HTTP connection pool and token cache.
///
/// # Example
///
/// ```ignore
/// let config = ProviderConfig::resolve(&profile)?;
/// let gateway = Gateway::new();
/// let result = gateway.chat_with_tools(&config, &messages, 0.7, &tools).await?;
/// ```
#[derive(Clone)]
pub struct Gateway {
    http: Client,
    authenticator: VertexAuthenticator,
    vertex_host: Option<String>,
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new()
    }
}

impl Gateway {
    /// Create a gateway backed by the process-wide token cache
    pub fn new() -> Self {
        Self::with_token_cache(TokenCache::global())
    }

    /// Create a gateway with its own token cache
    pub fn with_token_cache(cache: Arc<TokenCache>) -> Self {
        let http = Client::new();
        Self {
            authenticator: VertexAuthenticator::new(http.clone(), cache),
            http,
            vertex_host: None,
        }
    }

    /// Use a preconfigured HTTP client (proxies, timeouts) for every request
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.authenticator = VertexAuthenticator::new(http.clone(), self.authenticator.cache().clone());
        self.http = http;
        self
    }

    /// Send Vertex AI requests to `host` instead of `https://{location}-aiplatform.googleapis.com`
    pub fn with_vertex_host(mut self, host: impl Into<String>) -> Self {
        self.vertex_host = Some(host.into());
        self
    }

    pub fn token_cache(&self) -> &Arc<TokenCache> {
        self.authenticator.cache()
    }

    /// Build the protocol client for `config`.
    pub fn client_for(&self, config: &ProviderConfig) -> Result<Box<dyn LlmClient>> {
        ProviderRegistry::create(
            config,
            &self.http,
            &self.authenticator,
            self.vertex_host.as_deref(),
        )
    }

    /// Send one chat request and return text plus any tool calls.
    pub async fn chat_with_tools(
        &self,
        config: &ProviderConfig,
        messages: &[ChatMessage],
        temperature: f64,
        tools: &[ToolDefinition],
    ) -> Result<ChatResult> {
        self.client_for(config)?
            .chat(messages, temperature, tools)
            .await
    }

    /// Text-only chat without tools.
    pub async fn chat(
        &self,
        config: &ProviderConfig,
        messages: &[ChatMessage],
        temperature: f64,
    ) -> Result<String> {
        Ok(self
            .chat_with_tools(config, messages, temperature, &[])
            .await?
            .text)
    }

    /// List models offered by the configured provider, sorted by id.
    pub async fn fetch_models(&self, config: &ProviderConfig) -> Result<Vec<ModelInfo>> {
        catalog::fetch_models(
            config,
            &self.http,
            &self.authenticator,
            self.vertex_host.as_deref(),
        )
        .await
    }
}
