//! In-memory document store with unique email/google-id indexes.
//!
//! Backs all three store traits behind `tokio::sync::RwLock<HashMap>`
//! collections. Concurrent updates to the same record are last-write-wins;
//! no optimistic-concurrency token is checked.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Entity, EntityMetrics, Insight, InsightType, User};

use super::{
    EntityPatch, EntityQuery, EntityStore, InsightStore, NewEntity, NewInsight, NewUser,
    ProfileUpdate, SortKey, StoreError, UserStore,
};

/// User rows plus their unique indexes (case-folded email and Google subject
/// id). Kept behind a single lock so no operation ever holds more than one,
/// which rules out lock-order inversions between writers and lookups.
#[derive(Default)]
struct UserTable {
    rows: HashMap<Uuid, User>,
    email_index: HashMap<String, Uuid>,
    google_index: HashMap<String, Uuid>,
}

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<UserTable>,
    entities: RwLock<HashMap<Uuid, Entity>>,
    insights: RwLock<HashMap<Uuid, Insight>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        let mut table = self.users.write().await;

        if table.email_index.contains_key(&new.email) {
            return Err(StoreError::DuplicateEmail);
        }
        if let Some(google_id) = &new.google_id {
            if table.google_index.contains_key(google_id) {
                return Err(StoreError::DuplicateGoogleId);
            }
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new.email.clone(),
            password_hash: new.password_hash,
            name: new.name,
            avatar_url: new.avatar_url,
            google_id: new.google_id.clone(),
            created_at: now,
            updated_at: now,
        };

        table.email_index.insert(new.email, user.id);
        if let Some(google_id) = new.google_id {
            table.google_index.insert(google_id, user.id);
        }
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let table = self.users.read().await;
        Ok(table.email_index.get(email).and_then(|id| table.rows.get(id)).cloned())
    }

    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, StoreError> {
        let table = self.users.read().await;
        Ok(table.google_index.get(google_id).and_then(|id| table.rows.get(id)).cloned())
    }

    async fn link_google_id(&self, id: Uuid, google_id: &str) -> Result<User, StoreError> {
        let mut table = self.users.write().await;

        if table.google_index.get(google_id).map_or(false, |owner| *owner != id) {
            return Err(StoreError::DuplicateGoogleId);
        }

        let user = table.rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.google_id = Some(google_id.to_string());
        user.updated_at = Utc::now();
        let user = user.clone();
        table.google_index.insert(google_id.to_string(), id);
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User, StoreError> {
        let mut table = self.users.write().await;
        let user = table.rows.get_mut(&id).ok_or(StoreError::NotFound)?;

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(avatar_url) = update.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

fn sort_entities(entities: &mut [Entity], sort: SortKey) {
    match sort {
        SortKey::Newest => entities.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Views => entities.sort_by(|a, b| b.metrics.views.cmp(&a.metrics.views)),
        SortKey::Engagement => entities.sort_by(|a, b| {
            b.metrics
                .engagement
                .partial_cmp(&a.metrics.engagement)
                .unwrap_or(Ordering::Equal)
        }),
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn create(&self, new: NewEntity) -> Result<Entity, StoreError> {
        let now = Utc::now();
        let entity = Entity {
            id: Uuid::new_v4(),
            owner_id: new.owner_id,
            title: new.title,
            description: new.description,
            category: new.category,
            status: Default::default(),
            priority: new.priority,
            tags: new.tags,
            metrics: EntityMetrics::default(),
            created_at: now,
            updated_at: now,
        };
        self.entities.write().await.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn list(
        &self,
        owner_id: Uuid,
        query: &EntityQuery,
    ) -> Result<(Vec<Entity>, u64), StoreError> {
        let entities = self.entities.read().await;
        let mut matched: Vec<Entity> = entities
            .values()
            .filter(|e| e.owner_id == owner_id)
            .filter(|e| query.category.as_deref().map_or(true, |c| e.category == c))
            .filter(|e| query.status.map_or(true, |s| e.status == s))
            .cloned()
            .collect();

        let total = matched.len() as u64;
        sort_entities(&mut matched, query.sort);

        let skip = query.page.saturating_sub(1).saturating_mul(query.limit) as usize;
        let page: Vec<Entity> =
            matched.into_iter().skip(skip).take(query.limit as usize).collect();
        Ok((page, total))
    }

    async fn list_all(&self, owner_id: Uuid) -> Result<Vec<Entity>, StoreError> {
        let entities = self.entities.read().await;
        Ok(entities.values().filter(|e| e.owner_id == owner_id).cloned().collect())
    }

    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Entity>, StoreError> {
        let entities = self.entities.read().await;
        Ok(entities.get(&id).filter(|e| e.owner_id == owner_id).cloned())
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: EntityPatch,
    ) -> Result<Entity, StoreError> {
        let mut entities = self.entities.write().await;
        let entity = entities
            .get_mut(&id)
            .filter(|e| e.owner_id == owner_id)
            .ok_or(StoreError::NotFound)?;

        if let Some(title) = patch.title {
            entity.title = title;
        }
        if let Some(description) = patch.description {
            entity.description = Some(description);
        }
        if let Some(status) = patch.status {
            entity.status = status;
        }
        if let Some(priority) = patch.priority {
            entity.priority = priority;
        }
        if let Some(tags) = patch.tags {
            entity.tags = tags;
        }
        entity.updated_at = Utc::now();
        Ok(entity.clone())
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), StoreError> {
        let mut entities = self.entities.write().await;
        match entities.get(&id) {
            Some(e) if e.owner_id == owner_id => {
                entities.remove(&id);
                Ok(())
            }
            _ => Err(StoreError::NotFound),
        }
    }
}

#[async_trait]
impl InsightStore for MemoryStore {
    async fn create(&self, new: NewInsight) -> Result<Insight, StoreError> {
        let insight = Insight {
            id: Uuid::new_v4(),
            owner_id: new.owner_id,
            entity_id: new.entity_id,
            title: new.title,
            content: new.content,
            insight_type: new.insight_type,
            confidence: new.confidence,
            created_at: Utc::now(),
        };
        self.insights.write().await.insert(insight.id, insight.clone());
        Ok(insight)
    }

    async fn list(
        &self,
        owner_id: Uuid,
        limit: usize,
        insight_type: Option<InsightType>,
    ) -> Result<Vec<Insight>, StoreError> {
        let insights = self.insights.read().await;
        let mut matched: Vec<Insight> = insights
            .values()
            .filter(|i| i.owner_id == owner_id)
            .filter(|i| insight_type.map_or(true, |t| i.insight_type == t))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched.truncate(limit);
        Ok(matched)
    }
}
