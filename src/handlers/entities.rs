//! Owner-scoped CRUD over entities. Every read, update, and delete filters
//! by (id, owner id); a non-owned id answers exactly like a missing one.

use axum::{
    extract::{Path, State},
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiQuery, ApiResponse, AuthUser};
use crate::models::{Entity, EntityStatus, Priority};
use crate::state::AppState;
use crate::store::{EntityPatch, EntityQuery, NewEntity, SortKey};

use super::validate::{parse_body, FieldErrors};

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateEntityRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
}

/// Partial update. Category is immutable; owner id is never accepted here.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateEntityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<EntityStatus>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
}

/// GET /api/entities
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<ApiResponse<Value>, ApiError> {
    let query = build_query(params)?;
    let (entities, total) = state.entities.list(auth.user_id, &query).await?;

    let total_pages = total.div_ceil(query.limit);
    Ok(ApiResponse::success(json!({
        "entities": entities,
        "pagination": {
            "page": query.page,
            "limit": query.limit,
            "total": total,
            "totalPages": total_pages,
        },
    })))
}

fn build_query(params: ListParams) -> Result<EntityQuery, ApiError> {
    let mut errors = FieldErrors::new();

    let page = params.page.unwrap_or(1);
    if page < 1 {
        errors.add("page", "Must be at least 1");
    }
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let status = match params.status.as_deref() {
        None => None,
        Some("active") => Some(EntityStatus::Active),
        Some("inactive") => Some(EntityStatus::Inactive),
        Some(_) => {
            errors.add("status", "Must be one of: active, inactive");
            None
        }
    };

    let sort = match params.sort_by.as_deref() {
        None | Some("newest") => SortKey::Newest,
        Some("views") => SortKey::Views,
        Some("engagement") => SortKey::Engagement,
        Some(_) => {
            errors.add("sortBy", "Must be one of: newest, views, engagement");
            SortKey::Newest
        }
    };

    errors.into_result()?;
    Ok(EntityQuery { category: params.category, status, sort, page, limit })
}

/// POST /api/entities
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(body): ApiJson<Value>,
) -> Result<ApiResponse<Entity>, ApiError> {
    let input: CreateEntityRequest = parse_body(body)?;

    let mut errors = FieldErrors::new();
    if input.title.trim().is_empty() {
        errors.add("title", "Must not be empty");
    }
    if input.category.trim().is_empty() {
        errors.add("category", "Must not be empty");
    }
    errors.into_result()?;

    // Owner comes from the authenticated caller, never from the body
    let entity = state
        .entities
        .create(NewEntity {
            owner_id: auth.user_id,
            title: input.title.trim().to_string(),
            description: input.description,
            category: input.category.trim().to_string(),
            priority: input.priority.unwrap_or_default(),
            tags: input.tags.unwrap_or_default(),
        })
        .await?;

    Ok(ApiResponse::created(entity))
}

/// GET /api/entities/:id
pub async fn get_one(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Entity>, ApiError> {
    let id = parse_entity_id(&id)?;
    let entity = state
        .entities
        .get(auth.user_id, id)
        .await?
        .ok_or_else(entity_not_found)?;
    Ok(ApiResponse::success(entity))
}

/// PUT /api/entities/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result<ApiResponse<Entity>, ApiError> {
    let id = parse_entity_id(&id)?;
    let input: UpdateEntityRequest = parse_body(body)?;

    let mut errors = FieldErrors::new();
    if let Some(title) = &input.title {
        if title.trim().is_empty() {
            errors.add("title", "Must not be empty");
        }
    }
    errors.into_result()?;

    let entity = state
        .entities
        .update(
            auth.user_id,
            id,
            EntityPatch {
                title: input.title.map(|t| t.trim().to_string()),
                description: input.description,
                status: input.status,
                priority: input.priority,
                tags: input.tags,
            },
        )
        .await
        .map_err(|_| entity_not_found())?;

    Ok(ApiResponse::success(entity))
}

/// DELETE /api/entities/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Value>, ApiError> {
    let id = parse_entity_id(&id)?;
    state
        .entities
        .delete(auth.user_id, id)
        .await
        .map_err(|_| entity_not_found())?;
    Ok(ApiResponse::success(json!({ "message": "Entity deleted" })))
}

// An unparsable id cannot reference anything, so it answers like a missing
// record rather than leaking a distinct error shape.
fn parse_entity_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| entity_not_found())
}

fn entity_not_found() -> ApiError {
    ApiError::not_found("Entity not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ListParams {
        ListParams { page: None, limit: None, category: None, status: None, sort_by: None }
    }

    #[test]
    fn list_defaults() {
        let query = build_query(params()).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert_eq!(query.sort, SortKey::Newest);
        assert!(query.status.is_none());
    }

    #[test]
    fn oversized_limit_is_clamped() {
        let mut p = params();
        p.limit = Some(10_000);
        assert_eq!(build_query(p).unwrap().limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn unknown_sort_key_is_rejected() {
        let mut p = params();
        p.sort_by = Some("oldest".to_string());
        let err = build_query(p).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn malformed_id_reads_as_not_found() {
        let err = parse_entity_id("not-a-uuid").unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
