//! Error types for the gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving configuration or talking to a provider
#[derive(Error, Debug)]
pub enum Error {
    /// Credentials are insufficient for the declared format.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Service-account material is missing or malformed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The OAuth2 token endpoint answered with a non-2xx status.
    #[error("Authentication error: token endpoint returned {status}: {body}")]
    TokenRejected { status: u16, body: String },

    /// A completion or model-listing endpoint answered with a non-2xx status.
    #[error("{provider} API error {status}: {body}")]
    ProviderHttp {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The response body did not have the shape expected for its format.
    #[error("Unexpected response shape: {0}")]
    ResponseShape(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for both malformed credentials and a rejected token exchange.
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_) | Error::TokenRejected { .. })
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// HTTP status reported by an upstream endpoint, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::TokenRejected { status, .. } | Error::ProviderHttp { status, .. } => {
                Some(*status)
            }
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
