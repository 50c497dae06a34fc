//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - Error-to-HTTP mapping

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use filebay_core::file::FileService;
use filebay_core::storage::OpendalStore;
use filebay_db::{FileRepository, UserRepository};
use filebay_shared::TokenVerifier;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Bearer token verifier.
    pub verifier: Arc<TokenVerifier>,
    /// Object storage adapter.
    pub storage: Arc<OpendalStore>,
    /// Retention window for soft-deleted files, in days.
    pub retention_days: i64,
}

impl AppState {
    /// Assemble the file service over the state's storage and repositories.
    #[must_use]
    pub fn file_service(&self) -> FileService<OpendalStore, FileRepository, UserRepository> {
        FileService::new(
            self.storage.clone(),
            Arc::new(FileRepository::new((*self.db).clone())),
            Arc::new(UserRepository::new((*self.db).clone())),
        )
        .with_retention_days(self.retention_days)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
