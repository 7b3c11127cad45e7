use std::sync::Arc;

use pulseboard_api::auth::google::HttpGoogleVerifier;
use pulseboard_api::config::AppConfig;
use pulseboard_api::insight::OpenAiCompatibleGenerator;
use pulseboard_api::routes::app;
use pulseboard_api::state::AppState;
use pulseboard_api::store::MemoryStore;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up JWT_SECRET, INSIGHT_API_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulseboard_api=info,tower_http=info".into()),
        )
        .init();

    let config = Arc::new(AppConfig::from_env());
    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; token issue will fail");
    }

    let google = Arc::new(HttpGoogleVerifier::new(&config.google));
    let generator = Arc::new(OpenAiCompatibleGenerator::from_config(&config.insight));
    let store = Arc::new(MemoryStore::new());

    let state = AppState {
        config: config.clone(),
        users: store.clone(),
        entities: store.clone(),
        insights: store,
        google,
        generator,
    };

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("pulseboard-api listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.expect("server");
}
