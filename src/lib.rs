pub mod analytics;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod insight;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
