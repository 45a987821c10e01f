//! HTTP API handlers for spinkit-api

pub mod admin;
pub mod buildinfo;
pub mod cities;
pub mod genres;
pub mod health;
pub mod listings;

use axum::{routing::get, Router};

use crate::AppState;

pub use buildinfo::{get_build_info, BuildInfo};
pub use health::health_routes;

/// Listing and detail routes for every entity kind
pub fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/api/djs", get(listings::list_djs))
        .route("/api/djs/:id", get(listings::get_dj))
        .route("/api/venues", get(listings::list_venues))
        .route("/api/venues/:id", get(listings::get_venue))
        .route("/api/events", get(listings::list_events))
        .route("/api/events/:id", get(listings::get_event))
        .route("/api/recordings", get(listings::list_recordings))
        .route("/api/recordings/:id", get(listings::get_recording))
}

/// City and genre browse routes
pub fn browse_routes() -> Router<AppState> {
    Router::new()
        .route("/api/cities/:city_name", get(cities::get_city))
        .route("/api/genres", get(genres::list_genres))
        .route("/api/genres/:genre_name", get(genres::get_genre))
}

/// Admin Notion export routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/notion/list-databases", get(admin::list_databases))
        .route(
            "/api/admin/notion/export-database/:database_id",
            get(admin::export_database),
        )
}
