//! Extractors whose rejections answer in the response envelope. The stock
//! `Json` and `Query` extractors reply with plain-text bodies on a
//! malformed request; these wrappers map every rejection to a 400 envelope.

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// `Json` with enveloped rejections. Covers unreadable bodies, a missing
/// or wrong content type, and JSON syntax errors.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::validation_error(
                format!("Invalid request body: {}", rejection.body_text()),
                None,
            )),
        }
    }
}

/// `Query` with enveloped rejections, for parameters that fail to
/// deserialize (e.g. `page=abc` where a number is expected).
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(ApiError::validation_error(
                format!("Invalid query string: {}", rejection.body_text()),
                None,
            )),
        }
    }
}
