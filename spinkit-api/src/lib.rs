//! spinkit-api library - listing service for the SpinKit discovery pages
//!
//! Serves DJ, venue, event and recording listings from a catalog seeded with
//! JSON mock data, plus admin routes that export Notion databases.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod notion;

pub use crate::error::{ApiError, ApiResult};

use crate::notion::NotionClient;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Listing catalog
    pub db: SqlitePool,
    /// Notion client, present only when an API key is configured
    pub notion: Option<NotionClient>,
}

impl AppState {
    pub fn new(db: SqlitePool, notion: Option<NotionClient>) -> Self {
        Self { db, notion }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .merge(api::listing_routes())
        .merge(api::browse_routes())
        .merge(api::admin_routes())
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
