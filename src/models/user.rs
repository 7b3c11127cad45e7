use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A user account. Password-based accounts carry a password hash;
/// Google-only accounts carry a google_id and no hash; linked accounts
/// carry both.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    /// Stored case-folded; uniqueness is enforced on the folded form.
    pub email: String,
    /// Never serialized outward. `None` for external-identity-only accounts.
    pub password_hash: Option<String>,
    pub name: String,
    pub avatar_url: Option<String>,
    /// Google subject id, unique when present.
    pub google_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a user, safe to serialize in any response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn public(&self) -> UserPublic {
        UserPublic {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            avatar: self.avatar_url.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
