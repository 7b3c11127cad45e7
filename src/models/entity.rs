use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EntityMetrics {
    pub views: i64,
    pub engagement: f64,
    pub score: f64,
}

impl Default for EntityMetrics {
    fn default() -> Self {
        Self { views: 0, engagement: 0.0, score: 0.0 }
    }
}

/// A user-owned tracked record. `owner_id` is set once from the
/// authenticated caller and never read from a request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub status: EntityStatus,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub metrics: EntityMetrics,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
