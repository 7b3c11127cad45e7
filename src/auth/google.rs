//! Google identity verification.
//!
//! The idToken is checked against Google's public tokeninfo endpoint and
//! must be audience-bound to our OAuth client id. Network errors, malformed
//! tokens, and audience mismatches all surface as `GoogleAuthError`, which
//! the handler maps to a 400, never a 500.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GoogleConfig;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Identity fields extracted from a verified Google idToken.
#[derive(Debug, Clone)]
pub struct GoogleIdentity {
    pub subject: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GoogleAuthError {
    #[error("token verification failed")]
    VerificationFailed,
    #[error("token audience mismatch")]
    AudienceMismatch,
    #[error("identity provider unreachable: {0}")]
    Unreachable(String),
}

#[async_trait]
pub trait GoogleTokenVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, GoogleAuthError>;
}

/// Verifier backed by Google's tokeninfo endpoint.
pub struct HttpGoogleVerifier {
    client: reqwest::Client,
    client_id: String,
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl HttpGoogleVerifier {
    pub fn new(config: &GoogleConfig) -> Self {
        Self { client: reqwest::Client::new(), client_id: config.client_id.clone() }
    }
}

#[async_trait]
impl GoogleTokenVerifier for HttpGoogleVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, GoogleAuthError> {
        let response = self
            .client
            .get(TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| GoogleAuthError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GoogleAuthError::VerificationFailed);
        }

        let info: TokenInfo =
            response.json().await.map_err(|_| GoogleAuthError::VerificationFailed)?;

        if info.aud != self.client_id {
            return Err(GoogleAuthError::AudienceMismatch);
        }

        Ok(GoogleIdentity {
            subject: info.sub,
            email: info.email,
            name: info.name.unwrap_or_else(|| "Google user".to_string()),
            picture: info.picture,
        })
    }
}
