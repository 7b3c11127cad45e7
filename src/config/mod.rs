use serde::{Deserialize, Serialize};
use std::env;

/// Process configuration, built once in `main` and passed by reference
/// through `AppState`. Never read from ambient globals after startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub google: GoogleConfig,
    pub insight: InsightConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// OAuth client id the idToken audience must match.
    pub client_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    /// OpenAI-compatible chat-completions endpoint base.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub request_timeout_secs: u64,
}

// One week
const DEFAULT_JWT_EXPIRY_SECS: u64 = 604_800;

impl AppConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn defaults() -> Self {
        Self {
            server: ServerConfig { port: 3000 },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_secs: DEFAULT_JWT_EXPIRY_SECS,
            },
            google: GoogleConfig { client_id: String::new() },
            insight: InsightConfig {
                base_url: "https://api.openai.com/v1".to_string(),
                api_key: String::new(),
                model: "gpt-4o-mini".to_string(),
                request_timeout_secs: 30,
            },
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_SECS") {
            self.security.jwt_expiry_secs = v.parse().unwrap_or(self.security.jwt_expiry_secs);
        }

        if let Ok(v) = env::var("GOOGLE_CLIENT_ID") {
            self.google.client_id = v;
        }

        if let Ok(v) = env::var("INSIGHT_API_BASE_URL") {
            self.insight.base_url = v;
        }
        if let Ok(v) = env::var("INSIGHT_API_KEY") {
            self.insight.api_key = v;
        }
        if let Ok(v) = env::var("INSIGHT_MODEL") {
            self.insight.model = v;
        }
        if let Ok(v) = env::var("INSIGHT_TIMEOUT_SECS") {
            self.insight.request_timeout_secs =
                v.parse().unwrap_or(self.insight.request_timeout_secs);
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_week_long_expiry() {
        let config = AppConfig::defaults();
        assert_eq!(config.security.jwt_expiry_secs, 604_800);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn defaults_point_at_openai() {
        let config = AppConfig::defaults();
        assert!(config.insight.base_url.contains("api.openai.com"));
    }
}
