#![allow(dead_code)] // each test binary uses a different slice of the harness

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use pulseboard_api::auth::google::{GoogleAuthError, GoogleIdentity, GoogleTokenVerifier};
use pulseboard_api::config::AppConfig;
use pulseboard_api::insight::{ProviderError, TextGenerator};
use pulseboard_api::routes::app;
use pulseboard_api::state::AppState;
use pulseboard_api::store::MemoryStore;

/// Google verifier that accepts a fixed set of fake idTokens.
#[derive(Default)]
pub struct MockGoogleVerifier {
    identities: HashMap<String, GoogleIdentity>,
}

impl MockGoogleVerifier {
    pub fn with_identity(mut self, id_token: &str, subject: &str, email: &str, name: &str) -> Self {
        self.identities.insert(
            id_token.to_string(),
            GoogleIdentity {
                subject: subject.to_string(),
                email: email.to_string(),
                name: name.to_string(),
                picture: None,
            },
        );
        self
    }
}

#[async_trait]
impl GoogleTokenVerifier for MockGoogleVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, GoogleAuthError> {
        self.identities.get(id_token).cloned().ok_or(GoogleAuthError::VerificationFailed)
    }
}

/// Scripted text-generation provider.
pub enum MockGenerator {
    Reply(String),
    AuthFailure,
    Unavailable,
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        match self {
            MockGenerator::Reply(text) => Ok(text.clone()),
            MockGenerator::AuthFailure => Err(ProviderError::AuthFailed),
            MockGenerator::Unavailable => {
                Err(ProviderError::RequestFailed("secret-internal-detail".to_string()))
            }
        }
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

pub struct TestApp {
    router: Router,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::from_env();
    config.security.jwt_secret = "integration-test-secret".to_string();
    config.security.jwt_expiry_secs = 3600;
    config
}

pub fn test_app() -> TestApp {
    test_app_with(MockGoogleVerifier::default(), MockGenerator::Reply("insight text".into()))
}

pub fn test_app_with(google: MockGoogleVerifier, generator: MockGenerator) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState {
        config: Arc::new(test_config()),
        users: store.clone(),
        entities: store.clone(),
        insights: store,
        google: Arc::new(google),
        generator: Arc::new(generator),
    };
    TestApp { router: app(state) }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("router call failed")?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .context("failed to read response body")?;
        let value: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };
        Ok((status, value))
    }

    /// POST an arbitrary body, bypassing JSON serialization. Used to
    /// exercise requests the extractors must reject.
    pub async fn post_raw(
        &self,
        uri: &str,
        token: Option<&str>,
        content_type: &str,
        body: &str,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", content_type);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = builder.body(Body::from(body.to_string()))?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("router call failed")?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .context("failed to read response body")?;
        let value: Value =
            serde_json::from_slice(&bytes).context("response body is not JSON")?;
        Ok((status, value))
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> Result<(StatusCode, Value)> {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn put(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> Result<(StatusCode, Value)> {
        self.request("PUT", uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request("DELETE", uri, token, None).await
    }

    /// Register an account and return its access token.
    pub async fn signup(&self, email: &str, password: &str, name: &str) -> Result<String> {
        let (status, body) = self
            .post(
                "/api/auth/signup",
                None,
                serde_json::json!({ "email": email, "password": password, "name": name }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "signup failed: {status} {body}");
        body["data"]["accessToken"]
            .as_str()
            .map(str::to_string)
            .context("signup response missing accessToken")
    }

    /// Create an entity and return its JSON representation.
    pub async fn create_entity(&self, token: &str, title: &str, category: &str) -> Result<Value> {
        let (status, body) = self
            .post(
                "/api/entities",
                Some(token),
                serde_json::json!({ "title": title, "category": category }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "entity create failed: {status} {body}");
        Ok(body["data"].clone())
    }
}
