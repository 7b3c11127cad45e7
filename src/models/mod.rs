pub mod entity;
pub mod insight;
pub mod user;

pub use entity::{Entity, EntityMetrics, EntityStatus, Priority};
pub use insight::{Insight, InsightType};
pub use user::{User, UserPublic};
