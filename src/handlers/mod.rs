pub mod analytics;
pub mod auth;
pub mod entities;
pub mod insights;

pub(crate) mod validate;
