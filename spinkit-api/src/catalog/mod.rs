//! Listing catalog
//!
//! SQLite store for DJ, venue, event and recording listings. The catalog is
//! rebuilt from JSON mock data at every startup, so it lives in memory by
//! default. Genres are stored as JSON arrays and matched with `json_each`.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use spinkit_common::{EntityKind, Result};
use tracing::info;

mod queries;
mod seed;

pub use queries::{
    find_by_genre, find_by_id, find_by_location, genre_counts, list_page, ListingFilter,
};
pub use seed::{seed_catalog, MockData};

/// Table backing each entity kind
pub fn table_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Dj => "djs",
        EntityKind::Venue => "venues",
        EntityKind::Event => "events",
        EntityKind::Recording => "recordings",
    }
}

/// Open an in-memory catalog and create its tables
///
/// An in-memory SQLite database lives as long as its connection, so the pool
/// holds exactly one connection and never recycles it.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    create_tables(&pool).await?;
    Ok(pool)
}

/// Create listing tables (idempotent)
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS djs (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            genres TEXT NOT NULL DEFAULT '[]',
            location TEXT NOT NULL DEFAULT '',
            score INTEGER NOT NULL DEFAULT 0,
            hourly_rate INTEGER NOT NULL DEFAULT 0,
            bio TEXT NOT NULL DEFAULT '',
            image_url TEXT,
            added_date TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS venues (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            location TEXT NOT NULL DEFAULT '',
            capacity INTEGER NOT NULL DEFAULT 0,
            venue_type TEXT NOT NULL DEFAULT '',
            genres TEXT NOT NULL DEFAULT '[]',
            score INTEGER NOT NULL DEFAULT 0,
            image_url TEXT,
            added_date TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            venue_name TEXT NOT NULL DEFAULT '',
            location TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL,
            genres TEXT NOT NULL DEFAULT '[]',
            ticket_price INTEGER NOT NULL DEFAULT 0,
            score INTEGER NOT NULL DEFAULT 0,
            image_url TEXT,
            added_date TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS recordings (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            dj_name TEXT NOT NULL DEFAULT '',
            genres TEXT NOT NULL DEFAULT '[]',
            duration_minutes INTEGER NOT NULL DEFAULT 0,
            plays INTEGER NOT NULL DEFAULT 0,
            score INTEGER NOT NULL DEFAULT 0,
            audio_url TEXT,
            added_date TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Catalog tables ready");
    Ok(())
}
