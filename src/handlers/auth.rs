//! Account lifecycle: signup, login, Google login, profile, logout.

use axum::{extract::State, Extension};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::auth::{issue_token, password, IssuedToken};
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, AuthUser};
use crate::models::UserPublic;
use crate::state::AppState;
use crate::store::{NewUser, ProfileUpdate};

use super::validate::{fold_email, is_valid_email, parse_body, FieldErrors};

const MIN_PASSWORD_LEN: usize = 8;
// One generic message for unknown email, external-only account, and hash
// mismatch, so responses cannot be used to enumerate accounts.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GoogleLoginRequest {
    pub id_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<ApiResponse<IssuedToken>, ApiError> {
    let input: SignupRequest = parse_body(body)?;

    let mut errors = FieldErrors::new();
    if !is_valid_email(&input.email) {
        errors.add("email", "Must be a valid email address");
    }
    // Character count, not byte length: multibyte passwords count per char
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        errors.add("password", "Must be at least 8 characters");
    }
    if input.name.trim().is_empty() {
        errors.add("name", "Must not be empty");
    }
    errors.into_result()?;

    let password_hash = password::hash_password(&input.password).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;

    let user = state
        .users
        .create(NewUser {
            email: fold_email(&input.email),
            password_hash: Some(password_hash),
            name: input.name.trim().to_string(),
            avatar_url: None,
            google_id: None,
        })
        .await?;

    tracing::info!(user_id = %user.id, "account created");
    let issued = issue_token(&state.config.security, user.id, &user.email)
        .map_err(internal_jwt_error)?;
    Ok(ApiResponse::created(issued))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<ApiResponse<IssuedToken>, ApiError> {
    let input: LoginRequest = parse_body(body)?;

    let mut errors = FieldErrors::new();
    if input.email.trim().is_empty() {
        errors.add("email", "Must not be empty");
    }
    if input.password.is_empty() {
        errors.add("password", "Must not be empty");
    }
    errors.into_result()?;

    let user = state.users.find_by_email(&fold_email(&input.email)).await?;

    // Unknown email, Google-only account, and wrong password all take the
    // same exit
    let user = match user {
        Some(user) => user,
        None => return Err(ApiError::unauthorized(INVALID_CREDENTIALS)),
    };
    let hash = match &user.password_hash {
        Some(hash) => hash,
        None => return Err(ApiError::unauthorized(INVALID_CREDENTIALS)),
    };

    let matches = password::verify_password(&input.password, hash).map_err(|e| {
        tracing::error!(user_id = %user.id, "stored password hash unreadable: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;
    if !matches {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let issued = issue_token(&state.config.security, user.id, &user.email)
        .map_err(internal_jwt_error)?;
    Ok(ApiResponse::success(issued))
}

/// POST /api/auth/google
///
/// Three explicit account branches: found by Google subject id, found by
/// email (an existing password account gets the Google identity linked),
/// or a fresh account with no password hash. A credential is issued on
/// every branch.
pub async fn google_login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<ApiResponse<IssuedToken>, ApiError> {
    let input: GoogleLoginRequest = parse_body(body)?;
    if input.id_token.trim().is_empty() {
        return Err(ApiError::bad_request("idToken is required"));
    }

    let identity = state.google.verify(&input.id_token).await.map_err(|e| {
        tracing::warn!("google token verification failed: {}", e);
        ApiError::bad_request("Google token verification failed")
    })?;

    let email = fold_email(&identity.email);

    let user = if let Some(user) = state.users.find_by_google_id(&identity.subject).await? {
        user
    } else if let Some(existing) = state.users.find_by_email(&email).await? {
        tracing::info!(user_id = %existing.id, "linking google identity to existing account");
        state.users.link_google_id(existing.id, &identity.subject).await?
    } else {
        state
            .users
            .create(NewUser {
                email,
                password_hash: None,
                name: identity.name,
                avatar_url: identity.picture,
                google_id: Some(identity.subject),
            })
            .await?
    };

    let issued = issue_token(&state.config.security, user.id, &user.email)
        .map_err(internal_jwt_error)?;
    Ok(ApiResponse::success(issued))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<UserPublic>, ApiError> {
    // The account can vanish between token issue and use
    let user = state
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::success(user.public()))
}

/// PUT /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(body): ApiJson<Value>,
) -> Result<ApiResponse<UserPublic>, ApiError> {
    let input: ProfileUpdateRequest = parse_body(body)?;

    let mut errors = FieldErrors::new();
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            errors.add("name", "Must not be empty");
        }
    }
    if let Some(avatar) = &input.avatar {
        if Url::parse(avatar).is_err() {
            errors.add("avatar", "Must be a well-formed URI");
        }
    }
    errors.into_result()?;

    let user = state
        .users
        .update_profile(
            auth.user_id,
            ProfileUpdate {
                name: input.name.map(|n| n.trim().to_string()),
                avatar_url: input.avatar,
            },
        )
        .await
        .map_err(|_| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(user.public()))
}

/// POST /api/auth/logout
///
/// Stateless acknowledgement. There is no server-side revocation list;
/// clients dispose of the credential themselves.
pub async fn logout(Extension(_auth): Extension<AuthUser>) -> ApiResponse<Value> {
    ApiResponse::success(json!({ "message": "Logged out" }))
}

fn internal_jwt_error(err: crate::auth::JwtError) -> ApiError {
    tracing::error!("token issue failed: {}", err);
    ApiError::internal_server_error("An error occurred while processing your request")
}
