//! VertexAuthenticator - exchanges a service-account JWT for an access token
//!
//! Manages the OAuth2 JWT bearer flow:
//! - Assertion signing from the service-account key
//! - Token exchange against the key's `token_uri`
//! - Token caching until shortly before expiry

use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;

use super::credentials::{CachedToken, TokenCache};
use super::service_account::{ServiceAccount, JWT_BEARER_GRANT};
use super::vertex::VertexConfig;
use crate::error::Error;
use crate::Result;

/// Lifetime assumed when the token endpoint omits `expires_in`
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Google OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Vertex AI access-token provider
#[derive(Clone)]
pub struct VertexAuthenticator {
    http_client: Client,
    cache: Arc<TokenCache>,
}

impl VertexAuthenticator {
    /// Create an authenticator backed by the given cache
    pub fn new(http_client: Client, cache: Arc<TokenCache>) -> Self {
        Self { http_client, cache }
    }

    pub fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    /// Get a valid access token, exchanging a fresh assertion when the
    /// cached one is missing or about to expire.
    ///
    /// Concurrent callers for the same cache key wait on a single exchange.
    pub async fn get_access_token(&self, vertex: &VertexConfig) -> Result<String> {
        let account = ServiceAccount::from_json(&vertex.service_account_json)?;
        let cache_key = vertex.cache_key(&account.client_email);

        if let Some(token) = self.cache.get(&cache_key, unix_now()) {
            tracing::debug!("Using cached Vertex access token for {}", cache_key);
            return Ok(token);
        }

        let lock = self.cache.acquisition_lock(&cache_key);
        let _guard = lock.lock().await;

        // Another caller may have finished the exchange while we waited
        if let Some(token) = self.cache.get(&cache_key, unix_now()) {
            tracing::debug!("Vertex access token refreshed concurrently for {}", cache_key);
            return Ok(token);
        }

        let now = unix_now();
        let response = self.exchange(&account, now).await?;
        let expires_in = response.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);

        self.cache.insert(CachedToken::new(
            cache_key,
            response.access_token.clone(),
            now + expires_in,
        ));

        Ok(response.access_token)
    }

    /// Exchange a signed assertion for an access token
    async fn exchange(&self, account: &ServiceAccount, now: i64) -> Result<TokenResponse> {
        let assertion = account.sign_assertion(now)?;
        let form = [
            ("grant_type", JWT_BEARER_GRANT),
            ("assertion", assertion.as_str()),
        ];

        tracing::info!(
            "Exchanging service-account assertion for {} at {}",
            account.client_email,
            account.token_uri()
        );

        let response = self
            .http_client
            .post(account.token_uri())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!("Token endpoint rejected assertion ({})", status);
            return Err(Error::TokenRejected {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::Auth(format!("Failed to parse token response: {e}")))
    }
}

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
