//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for declarations, receipts and contributions
//! - Authentication middleware
//! - Mapping of domain errors to JSON responses

pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;

use axum::Router;
use ecclesia_core::storage::DocumentStore;
use ecclesia_shared::{DocumentsConfig, JwtService};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token verification.
    pub jwt_service: Arc<JwtService>,
    /// Where generated documents are written.
    pub documents: Arc<DocumentStore>,
    /// Template path and declaration settings.
    pub documents_config: Arc<DocumentsConfig>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
