//! Stored-insight listing and generation via the external text provider.

use axum::{extract::State, Extension};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::insight::GENERATED_CONFIDENCE;
use crate::middleware::{ApiJson, ApiQuery, ApiResponse, AuthUser};
use crate::models::{Insight, InsightType};
use crate::state::AppState;
use crate::store::NewInsight;

use super::validate::{parse_body, FieldErrors};

const DEFAULT_LIST_LIMIT: usize = 20;
const MAX_TITLE_LEN: usize = 80;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: String,
    pub entity_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
    #[serde(rename = "type")]
    pub insight_type: Option<String>,
}

/// POST /api/insights/generate
pub async fn generate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(body): ApiJson<Value>,
) -> Result<ApiResponse<Value>, ApiError> {
    let input: GenerateRequest = parse_body(body)?;

    let mut errors = FieldErrors::new();
    if input.prompt.trim().is_empty() {
        errors.add("prompt", "Must not be empty");
    }
    errors.into_result()?;

    // A linked entity must belong to the caller; a foreign id answers like
    // a missing one
    if let Some(entity_id) = input.entity_id {
        state
            .entities
            .get(auth.user_id, entity_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Entity not found"))?;
    }

    let content = state.generator.generate(input.prompt.trim()).await?;

    let insight = state
        .insights
        .create(NewInsight {
            owner_id: auth.user_id,
            entity_id: input.entity_id,
            title: derive_title(input.prompt.trim()),
            content,
            insight_type: InsightType::Generated,
            confidence: Some(GENERATED_CONFIDENCE),
        })
        .await?;

    Ok(ApiResponse::success(json!({
        "insight": insight,
        "confidence": GENERATED_CONFIDENCE,
        "model": state.generator.model(),
    })))
}

/// GET /api/insights?limit=..&type=..
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<ApiResponse<Vec<Insight>>, ApiError> {
    let insight_type = match params.insight_type.as_deref() {
        None => None,
        Some(raw) => Some(InsightType::parse(raw).ok_or_else(|| {
            ApiError::bad_request("type must be one of: trend, recommendation, generated")
        })?),
    };
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT).max(1);

    let insights = state.insights.list(auth.user_id, limit, insight_type).await?;
    Ok(ApiResponse::success(insights))
}

fn derive_title(prompt: &str) -> String {
    if prompt.chars().count() <= MAX_TITLE_LEN {
        return prompt.to_string();
    }
    let truncated: String = prompt.chars().take(MAX_TITLE_LEN).collect();
    format!("{truncated}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_prompts_title_verbatim() {
        assert_eq!(derive_title("Summarize March"), "Summarize March");
    }

    #[test]
    fn long_prompts_are_truncated_on_char_boundaries() {
        let prompt = "x".repeat(200);
        let title = derive_title(&prompt);
        assert_eq!(title.chars().count(), MAX_TITLE_LEN + 1);
        assert!(title.ends_with('…'));
    }
}
