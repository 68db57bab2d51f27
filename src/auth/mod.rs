//! Authentication for Vertex AI
//!
//! This module provides:
//! - Vertex configuration parsing (wrapper or bare service-account JSON)
//! - Service-account JWT assertion signing
//! - An injectable access-token cache
//! - VertexAuthenticator for the OAuth2 JWT bearer exchange

mod credentials;
mod provider;
mod service_account;
mod vertex;

pub use credentials::{CachedToken, TokenCache, REFRESH_MARGIN_SECS};
pub use provider::VertexAuthenticator;
pub use service_account::{
    Claims, ServiceAccount, ASSERTION_LIFETIME_SECS, CLOUD_PLATFORM_SCOPE, DEFAULT_TOKEN_URI,
    JWT_BEARER_GRANT,
};
pub use vertex::{has_usable_vertex_config, parse_vertex_config, VertexConfig, DEFAULT_LOCATION};
