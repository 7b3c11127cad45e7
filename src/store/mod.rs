//! Persistence contracts. Every entity/insight operation is owner-scoped:
//! reads, updates, and deletes filter by both record id and owner id, so a
//! non-owned id is indistinguishable from a missing one.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Entity, EntityStatus, Insight, InsightType, Priority, User};

pub mod memory;

pub use memory::MemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("google id already linked")]
    DuplicateGoogleId,
    #[error("record not found")]
    NotFound,
}

/// Fields for inserting a user. `email` must already be case-folded.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: Option<String>,
    pub name: String,
    pub avatar_url: Option<String>,
    pub google_id: Option<String>,
}

/// Partial profile update. Deliberately has no password field: the only
/// mutation path for a stored hash is the initial insert.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, new: NewUser) -> Result<User, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    /// Lookup by case-folded email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, StoreError>;
    /// Attach a Google subject id to an existing password account.
    async fn link_google_id(&self, id: Uuid, google_id: &str) -> Result<User, StoreError>;
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User, StoreError>;
}

#[derive(Debug, Clone)]
pub struct NewEntity {
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub priority: Priority,
    pub tags: Vec<String>,
}

/// Partial entity update. Category and metrics are immutable through this
/// path; owner id is never part of any update.
#[derive(Debug, Clone, Default)]
pub struct EntityPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<EntityStatus>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Newest,
    Views,
    Engagement,
}

/// List parameters. `page` is 1-based; the reported total counts the
/// filtered set, not the owner's whole collection.
#[derive(Debug, Clone)]
pub struct EntityQuery {
    pub category: Option<String>,
    pub status: Option<EntityStatus>,
    pub sort: SortKey,
    pub page: u64,
    pub limit: u64,
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn create(&self, new: NewEntity) -> Result<Entity, StoreError>;
    /// Returns the page slice and the filtered total.
    async fn list(&self, owner_id: Uuid, query: &EntityQuery)
        -> Result<(Vec<Entity>, u64), StoreError>;
    /// All entities for one owner, unordered. Unbounded by design; the
    /// analytics endpoints accept this scale limitation.
    async fn list_all(&self, owner_id: Uuid) -> Result<Vec<Entity>, StoreError>;
    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Entity>, StoreError>;
    async fn update(&self, owner_id: Uuid, id: Uuid, patch: EntityPatch)
        -> Result<Entity, StoreError>;
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct NewInsight {
    pub owner_id: Uuid,
    pub entity_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub insight_type: InsightType,
    pub confidence: Option<f64>,
}

#[async_trait]
pub trait InsightStore: Send + Sync {
    async fn create(&self, new: NewInsight) -> Result<Insight, StoreError>;
    /// Newest first, optionally filtered by type.
    async fn list(
        &self,
        owner_id: Uuid,
        limit: usize,
        insight_type: Option<InsightType>,
    ) -> Result<Vec<Insight>, StoreError>;
}
