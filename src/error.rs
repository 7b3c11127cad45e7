// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },
    // Duplicate signup email. Responds 400, not 409, to match the existing
    // wire contract (see DESIGN.md).
    DuplicateEmail,

    // 401 Unauthorized (missing credential)
    Unauthorized(String),

    // 403 Forbidden (bad or expired credential; the two are deliberately
    // indistinguishable to the client)
    Forbidden(String),

    // 404 Not Found (absent id or not owned by the caller; identical
    // response for both to avoid existence disclosure)
    NotFound(String),

    // 500 Internal Server Error
    ProviderError(String),
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::DuplicateEmail => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::ProviderError(_) => 500,
            ApiError::InternalServerError(_) => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::DuplicateEmail => "Email already registered",
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::ProviderError(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Convert to the standard JSON error envelope
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": self.message(),
            "statusCode": self.status_code(),
        });

        if let ApiError::ValidationError { field_errors: Some(field_errors), .. } = self {
            body["fieldErrors"] = json!(field_errors);
        }

        body
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::ValidationError { message: message.into(), field_errors }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn provider_error(message: impl Into<String>) -> Self {
        ApiError::ProviderError(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        match err {
            crate::store::StoreError::DuplicateEmail => ApiError::DuplicateEmail,
            crate::store::StoreError::DuplicateGoogleId => {
                // Two accounts racing to link the same Google identity
                tracing::error!("duplicate google id on account link");
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            crate::store::StoreError::NotFound => ApiError::not_found("Resource not found"),
        }
    }
}

impl From<crate::insight::provider::ProviderError> for ApiError {
    fn from(err: crate::insight::provider::ProviderError) -> Self {
        match err {
            crate::insight::provider::ProviderError::AuthFailed => {
                tracing::error!("text-generation provider rejected credentials");
                ApiError::provider_error("AI provider key invalid")
            }
            other => {
                // Log the real failure but keep provider internals off the wire
                tracing::error!("text-generation provider error: {}", other);
                ApiError::provider_error("Insight generation failed")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
