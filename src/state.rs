use std::sync::Arc;

use crate::auth::google::GoogleTokenVerifier;
use crate::config::AppConfig;
use crate::insight::TextGenerator;
use crate::store::{EntityStore, InsightStore, UserStore};

/// Shared request context: immutable configuration plus the store and
/// provider collaborators. Built once in `main`, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub entities: Arc<dyn EntityStore>,
    pub insights: Arc<dyn InsightStore>,
    pub google: Arc<dyn GoogleTokenVerifier>,
    pub generator: Arc<dyn TextGenerator>,
}
