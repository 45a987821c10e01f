//! City scene endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use spinkit_common::{Dj, EntityKind, Event, Venue};

use crate::catalog::{self, table_name};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Listings located in one city
#[derive(Debug, Serialize)]
pub struct CityDetail {
    pub name: String,
    pub djs: Vec<Dj>,
    pub venues: Vec<Venue>,
    pub events: Vec<Event>,
}

/// GET /api/cities/:city_name
///
/// Matches `location` by case-insensitive substring. 404 when nothing matches.
pub async fn get_city(
    State(state): State<AppState>,
    Path(city_name): Path<String>,
) -> ApiResult<Json<CityDetail>> {
    let city = city_name.trim();
    if city.is_empty() {
        return Err(ApiError::BadRequest("City name must not be empty".to_string()));
    }

    let djs = catalog::find_by_location::<Dj>(&state.db, table_name(EntityKind::Dj), city).await?;
    let venues = catalog::find_by_location::<Venue>(&state.db, table_name(EntityKind::Venue), city).await?;
    let events = catalog::find_by_location::<Event>(&state.db, table_name(EntityKind::Event), city).await?;

    if djs.is_empty() && venues.is_empty() && events.is_empty() {
        return Err(ApiError::NotFound(format!("No listings found for city: {}", city)));
    }

    Ok(Json(CityDetail {
        name: city.to_string(),
        djs,
        venues,
        events,
    }))
}
