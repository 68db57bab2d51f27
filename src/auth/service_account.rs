//! Service-account key parsing and JWT bearer assertion signing.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::Result;

/// Google OAuth2 token endpoint used when the key file names none
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scope requested for Vertex AI access
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// OAuth2 grant type for the JWT bearer flow
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// `exp - iat` of every assertion
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Fields of a service-account key file needed for the JWT flow
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceAccount {
    #[serde(default)]
    pub client_email: String,

    /// PEM-encoded PKCS#8 RSA private key
    #[serde(default)]
    pub private_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
}

/// Claims of the signed assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl ServiceAccount {
    /// Parse from the raw service-account JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let account: ServiceAccount = serde_json::from_str(json)
            .map_err(|e| Error::Auth(format!("Invalid service account JSON: {e}")))?;

        if account.client_email.trim().is_empty() || account.private_key.trim().is_empty() {
            return Err(Error::Auth(
                "service account JSON is missing client_email or private_key".to_string(),
            ));
        }

        Ok(account)
    }

    pub fn token_uri(&self) -> &str {
        self.token_uri
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_TOKEN_URI)
    }

    /// Claims for an assertion issued at `now` (unix seconds).
    pub fn claims(&self, now: i64) -> Claims {
        Claims {
            iss: self.client_email.clone(),
            scope: CLOUD_PLATFORM_SCOPE.to_string(),
            aud: self.token_uri().to_string(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        }
    }

    /// Build `base64url(header).base64url(claims).base64url(signature)`,
    /// signed with RS256.
    pub fn sign_assertion(&self, now: i64) -> Result<String> {
        let mut header = Header::new(Algorithm::RS256);
        header.typ = Some("JWT".to_string());

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| Error::Auth(format!("Invalid RSA private key (PEM): {e}")))?;

        encode(&header, &self.claims(now), &key)
            .map_err(|e| Error::Auth(format!("Failed to sign JWT: {e}")))
    }
}
