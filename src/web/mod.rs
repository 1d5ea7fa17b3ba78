//! Web layer - axum router, shared state and HTML views for the admin page.

/// Handler error type
pub mod error;
/// Route handlers
pub mod routes;
/// HTML rendering
pub mod views;

use crate::cache::PageCache;
use crate::config::server::ServerConfig;
use crate::core::resolver::Resolver;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// State shared by all handlers. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Rendered page cache, invalidated by add and delete
    pub cache: PageCache,
    /// Store URL resolver
    pub resolver: Arc<Resolver>,
}

impl AppState {
    /// State with an empty cache and the default four-store resolver.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            cache: PageCache::new(),
            resolver: Arc::new(Resolver::default()),
        }
    }
}

/// Builds the application router with tracing and request timeout layers.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/products", post(routes::add_product))
        .route(
            "/products/{id}/delete",
            get(routes::confirm_delete).post(routes::delete_product),
        )
        .route("/api/products", get(routes::list_products_json))
        .route("/health", get(routes::health))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
