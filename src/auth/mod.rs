use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;

pub mod google;
pub mod password;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// A freshly issued bearer credential plus its lifetime in seconds.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    MissingSecret,
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    /// Malformed, expired, or forged. Callers must not distinguish these
    /// to the end client.
    #[error("invalid credential")]
    InvalidCredential,
}

/// Issue a signed, time-limited credential for the given account.
pub fn issue_token(
    security: &SecurityConfig,
    user_id: Uuid,
    email: &str,
) -> Result<IssuedToken, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }

    let now = Utc::now();
    let expires_in = security.jwt_expiry_secs;
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: (now + Duration::seconds(expires_in as i64)).timestamp(),
        iat: now.timestamp(),
    };

    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    let token = encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))?;

    Ok(IssuedToken { access_token: token, expires_in })
}

/// Validate a bearer credential and extract its claims. All failure modes
/// collapse into `InvalidCredential`.
pub fn verify_token(security: &SecurityConfig, token: &str) -> Result<Claims, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| JwtError::InvalidCredential)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security() -> SecurityConfig {
        SecurityConfig { jwt_secret: "test-secret".to_string(), jwt_expiry_secs: 3600 }
    }

    #[test]
    fn issue_then_verify_round_trips_claims() {
        let sec = security();
        let user_id = Uuid::new_v4();
        let issued = issue_token(&sec, user_id, "a@example.com").unwrap();
        assert_eq!(issued.expires_in, 3600);

        let claims = verify_token(&sec, &issued.access_token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@example.com");
    }

    #[test]
    fn tampered_token_fails_uniformly() {
        let sec = security();
        let issued = issue_token(&sec, Uuid::new_v4(), "a@example.com").unwrap();

        let mut forged = issued.access_token;
        forged.pop();
        assert!(matches!(verify_token(&sec, &forged), Err(JwtError::InvalidCredential)));

        let other = SecurityConfig { jwt_secret: "other".to_string(), jwt_expiry_secs: 3600 };
        let foreign = issue_token(&other, Uuid::new_v4(), "b@example.com").unwrap();
        assert!(matches!(
            verify_token(&sec, &foreign.access_token),
            Err(JwtError::InvalidCredential)
        ));
    }

    #[test]
    fn empty_secret_is_rejected() {
        let sec = SecurityConfig { jwt_secret: String::new(), jwt_expiry_secs: 3600 };
        assert!(issue_token(&sec, Uuid::new_v4(), "a@example.com").is_err());
    }
}
