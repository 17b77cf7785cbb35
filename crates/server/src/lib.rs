//! HTTP boundary for the file-store registry.
//!
//! This crate provides:
//! - JSON:API routes for the file-store lifecycle
//! - Identity extraction from gateway-verified tokens
//! - The internal invoke endpoint
//! - Health and Prometheus endpoints

pub mod auth;
pub mod error;
pub mod handlers;
pub mod jsonapi;
pub mod metrics;
pub mod routes;
pub mod state;

pub use auth::TraceId;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
