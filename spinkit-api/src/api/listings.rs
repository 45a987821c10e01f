//! Listing endpoints with pagination, filtering and sorting
//!
//! `GET /api/{djs,venues,events,recordings}` return the paginated envelope;
//! `GET /api/{kind}/:id` return one item or 404.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;
use spinkit_common::pagination::{Paginated, DEFAULT_PAGE_LIMIT};
use spinkit_common::{Dj, EntityKind, Event, Recording, SortOrder, Venue};
use sqlx::sqlite::SqliteRow;
use sqlx::FromRow;

use crate::catalog::{self, ListingFilter};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    query
        .map(|Query(q)| q)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

/// Query parameters for `/api/djs`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DjQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub sort_by: Option<SortOrder>,
    /// Comma-separated genre names
    pub genres: Option<String>,
    pub location: Option<String>,
    pub min_score: Option<i64>,
    pub max_score: Option<i64>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

/// Query parameters for `/api/venues`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub sort_by: Option<SortOrder>,
    pub genres: Option<String>,
    pub location: Option<String>,
    pub min_capacity: Option<i64>,
    pub max_capacity: Option<i64>,
    pub min_score: Option<i64>,
    pub max_score: Option<i64>,
}

/// Query parameters for `/api/events`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub sort_by: Option<SortOrder>,
    pub genres: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_score: Option<i64>,
    pub max_score: Option<i64>,
}

/// Query parameters for `/api/recordings`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub sort_by: Option<SortOrder>,
    pub genres: Option<String>,
    pub dj_name: Option<String>,
    pub min_duration: Option<i64>,
    pub max_duration: Option<i64>,
    pub min_score: Option<i64>,
    pub max_score: Option<i64>,
}

/// GET /api/djs
pub async fn list_djs(
    State(state): State<AppState>,
    query: Result<Query<DjQuery>, QueryRejection>,
) -> ApiResult<Json<Paginated<Dj>>> {
    let q = parse_query(query)?;
    let filter = ListingFilter::default()
        .with_genres(q.genres.as_deref())
        .with_contains("location", q.location.as_deref())
        .with_range("score", q.min_score, q.max_score)
        .with_range("hourly_rate", q.min_price, q.max_price);

    let page = catalog::list_page(
        &state.db,
        catalog::table_name(EntityKind::Dj),
        &filter,
        q.sort_by.unwrap_or_default(),
        q.page,
        q.limit,
    )
    .await?;
    Ok(Json(page))
}

/// GET /api/venues
pub async fn list_venues(
    State(state): State<AppState>,
    query: Result<Query<VenueQuery>, QueryRejection>,
) -> ApiResult<Json<Paginated<Venue>>> {
    let q = parse_query(query)?;
    let filter = ListingFilter::default()
        .with_genres(q.genres.as_deref())
        .with_contains("location", q.location.as_deref())
        .with_range("capacity", q.min_capacity, q.max_capacity)
        .with_range("score", q.min_score, q.max_score);

    let page = catalog::list_page(
        &state.db,
        catalog::table_name(EntityKind::Venue),
        &filter,
        q.sort_by.unwrap_or_default(),
        q.page,
        q.limit,
    )
    .await?;
    Ok(Json(page))
}

/// GET /api/events
pub async fn list_events(
    State(state): State<AppState>,
    query: Result<Query<EventQuery>, QueryRejection>,
) -> ApiResult<Json<Paginated<Event>>> {
    let q = parse_query(query)?;
    let filter = ListingFilter::default()
        .with_genres(q.genres.as_deref())
        .with_contains("location", q.location.as_deref())
        .with_range("ticket_price", q.min_price, q.max_price)
        .with_range("score", q.min_score, q.max_score);

    let page = catalog::list_page(
        &state.db,
        catalog::table_name(EntityKind::Event),
        &filter,
        q.sort_by.unwrap_or_default(),
        q.page,
        q.limit,
    )
    .await?;
    Ok(Json(page))
}

/// GET /api/recordings
pub async fn list_recordings(
    State(state): State<AppState>,
    query: Result<Query<RecordingQuery>, QueryRejection>,
) -> ApiResult<Json<Paginated<Recording>>> {
    let q = parse_query(query)?;
    let filter = ListingFilter::default()
        .with_genres(q.genres.as_deref())
        .with_contains("dj_name", q.dj_name.as_deref())
        .with_range("duration_minutes", q.min_duration, q.max_duration)
        .with_range("score", q.min_score, q.max_score);

    let page = catalog::list_page(
        &state.db,
        catalog::table_name(EntityKind::Recording),
        &filter,
        q.sort_by.unwrap_or_default(),
        q.page,
        q.limit,
    )
    .await?;
    Ok(Json(page))
}

async fn detail<T>(state: &AppState, kind: EntityKind, id: &str) -> ApiResult<Json<T>>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    catalog::find_by_id::<T>(&state.db, catalog::table_name(kind), id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No {} with id {}", kind, id)))
}

/// GET /api/djs/:id
pub async fn get_dj(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Dj>> {
    detail(&state, EntityKind::Dj, &id).await
}

/// GET /api/venues/:id
pub async fn get_venue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Venue>> {
    detail(&state, EntityKind::Venue, &id).await
}

/// GET /api/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Event>> {
    detail(&state, EntityKind::Event, &id).await
}

/// GET /api/recordings/:id
pub async fn get_recording(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Recording>> {
    detail(&state, EntityKind::Recording, &id).await
}
