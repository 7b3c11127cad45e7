use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::handlers::{analytics, auth, entities, insights};
use crate::middleware::{bearer_auth_middleware, ApiResponse};
use crate::state::AppState;

/// Build the full application router. Signup, login, Google login, and the
/// health check are public; everything else sits behind the bearer
/// middleware.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/profile", put(auth::update_profile))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/entities", get(entities::list).post(entities::create))
        .route(
            "/api/entities/:id",
            get(entities::get_one).put(entities::update).delete(entities::delete),
        )
        .route("/api/analytics/dashboard", get(analytics::dashboard))
        .route("/api/analytics/performance", get(analytics::performance))
        .route("/api/insights", get(insights::list))
        .route("/api/insights/generate", post(insights::generate))
        .route_layer(from_fn_with_state(state.clone(), bearer_auth_middleware));

    Router::new()
        .route("/health", get(health))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/google", post(auth::google_login))
        .merge(protected)
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "status": "ok",
        "timestamp": Utc::now(),
    }))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
