//! Genre endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use spinkit_common::{Dj, EntityKind, Event, Recording, Venue};
use std::collections::BTreeMap;

use crate::catalog::{self, table_name};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Genre with listing counts per kind
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreSummary {
    pub name: String,
    pub dj_count: i64,
    pub venue_count: i64,
    pub event_count: i64,
    pub recording_count: i64,
}

/// Listings carrying one genre
#[derive(Debug, Serialize)]
pub struct GenreDetail {
    pub name: String,
    pub djs: Vec<Dj>,
    pub venues: Vec<Venue>,
    pub events: Vec<Event>,
    pub recordings: Vec<Recording>,
}

/// GET /api/genres
///
/// Every genre in the catalog, merged case-insensitively, sorted by name.
pub async fn list_genres(State(state): State<AppState>) -> ApiResult<Json<Vec<GenreSummary>>> {
    let mut merged: BTreeMap<String, GenreSummary> = BTreeMap::new();

    for kind in EntityKind::ALL {
        for (name, count) in catalog::genre_counts(&state.db, table_name(kind)).await? {
            let entry = merged
                .entry(name.to_lowercase())
                .or_insert_with(|| GenreSummary {
                    name: name.clone(),
                    ..Default::default()
                });
            match kind {
                EntityKind::Dj => entry.dj_count += count,
                EntityKind::Venue => entry.venue_count += count,
                EntityKind::Event => entry.event_count += count,
                EntityKind::Recording => entry.recording_count += count,
            }
        }
    }

    Ok(Json(merged.into_values().collect()))
}

/// GET /api/genres/:genre_name
pub async fn get_genre(
    State(state): State<AppState>,
    Path(genre_name): Path<String>,
) -> ApiResult<Json<GenreDetail>> {
    let genre = genre_name.trim();
    if genre.is_empty() || genre.contains(',') {
        return Err(ApiError::BadRequest(format!("Invalid genre name: {}", genre_name)));
    }

    let detail = GenreDetail {
        name: genre.to_string(),
        djs: catalog::find_by_genre(&state.db, table_name(EntityKind::Dj), genre).await?,
        venues: catalog::find_by_genre(&state.db, table_name(EntityKind::Venue), genre).await?,
        events: catalog::find_by_genre(&state.db, table_name(EntityKind::Event), genre).await?,
        recordings: catalog::find_by_genre(&state.db, table_name(EntityKind::Recording), genre)
            .await?,
    };

    if detail.djs.is_empty()
        && detail.venues.is_empty()
        && detail.events.is_empty()
        && detail.recordings.is_empty()
    {
        return Err(ApiError::NotFound(format!("No listings found for genre: {}", genre)));
    }

    Ok(Json(detail))
}
