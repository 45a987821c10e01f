//! Mock data loading and catalog seeding

use serde::de::DeserializeOwned;
use spinkit_common::{Dj, Error, Event, Recording, Result, Venue};
use sqlx::types::Json;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

const EMBEDDED_DJS: &str = include_str!("../../data/djs.json");
const EMBEDDED_VENUES: &str = include_str!("../../data/venues.json");
const EMBEDDED_EVENTS: &str = include_str!("../../data/events.json");
const EMBEDDED_RECORDINGS: &str = include_str!("../../data/recordings.json");

/// Flat JSON mock data for every listing kind
#[derive(Debug, Clone, Default)]
pub struct MockData {
    pub djs: Vec<Dj>,
    pub venues: Vec<Venue>,
    pub events: Vec<Event>,
    pub recordings: Vec<Recording>,
}

impl MockData {
    /// Mock data compiled into the binary
    pub fn embedded() -> Result<Self> {
        Ok(Self {
            djs: serde_json::from_str(EMBEDDED_DJS)?,
            venues: serde_json::from_str(EMBEDDED_VENUES)?,
            events: serde_json::from_str(EMBEDDED_EVENTS)?,
            recordings: serde_json::from_str(EMBEDDED_RECORDINGS)?,
        })
    }

    /// Mock data from `<dir>/{djs,venues,events,recordings}.json`
    pub fn from_dir(dir: &Path) -> Result<Self> {
        Ok(Self {
            djs: read_json(&dir.join("djs.json"))?,
            venues: read_json(&dir.join("venues.json"))?,
            events: read_json(&dir.join("events.json"))?,
            recordings: read_json(&dir.join("recordings.json"))?,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Cannot read mock data {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid mock data {}: {}", path.display(), e)))
}

/// Replace catalog contents with `data`
pub async fn seed_catalog(pool: &SqlitePool, data: &MockData) -> Result<()> {
    let mut tx = pool.begin().await?;

    for table in ["djs", "venues", "events", "recordings"] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await?;
    }

    for dj in &data.djs {
        sqlx::query(
            "INSERT INTO djs (id, name, genres, location, score, hourly_rate, bio, image_url, added_date)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&dj.id)
        .bind(&dj.name)
        .bind(Json(&dj.genres))
        .bind(&dj.location)
        .bind(dj.score)
        .bind(dj.hourly_rate)
        .bind(&dj.bio)
        .bind(&dj.image_url)
        .bind(dj.added_date)
        .execute(&mut *tx)
        .await?;
    }

    for venue in &data.venues {
        sqlx::query(
            "INSERT INTO venues (id, name, location, capacity, venue_type, genres, score, image_url, added_date)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&venue.id)
        .bind(&venue.name)
        .bind(&venue.location)
        .bind(venue.capacity)
        .bind(&venue.venue_type)
        .bind(Json(&venue.genres))
        .bind(venue.score)
        .bind(&venue.image_url)
        .bind(venue.added_date)
        .execute(&mut *tx)
        .await?;
    }

    for event in &data.events {
        sqlx::query(
            "INSERT INTO events (id, name, venue_name, location, date, genres, ticket_price, score, image_url, added_date)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&event.id)
        .bind(&event.name)
        .bind(&event.venue_name)
        .bind(&event.location)
        .bind(event.date)
        .bind(Json(&event.genres))
        .bind(event.ticket_price)
        .bind(event.score)
        .bind(&event.image_url)
        .bind(event.added_date)
        .execute(&mut *tx)
        .await?;
    }

    for rec in &data.recordings {
        sqlx::query(
            "INSERT INTO recordings (id, name, dj_name, genres, duration_minutes, plays, score, audio_url, added_date)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&rec.id)
        .bind(&rec.name)
        .bind(&rec.dj_name)
        .bind(Json(&rec.genres))
        .bind(rec.duration_minutes)
        .bind(rec.plays)
        .bind(rec.score)
        .bind(&rec.audio_url)
        .bind(rec.added_date)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!(
        "Catalog seeded: {} DJs, {} venues, {} events, {} recordings",
        data.djs.len(),
        data.venues.len(),
        data.events.len(),
        data.recordings.len()
    );
    Ok(())
}
