use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Trend,
    Recommendation,
    Generated,
}

impl InsightType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "trend" => Some(InsightType::Trend),
            "recommendation" => Some(InsightType::Recommendation),
            "generated" => Some(InsightType::Generated),
            _ => None,
        }
    }
}

/// A stored piece of generated or derived text, owned by a user and
/// optionally linked to one of their entities. Insights are write-once;
/// no update timestamp is tracked.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub created_at: DateTime<Utc>,
}
