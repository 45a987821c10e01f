//! Listing models
//!
//! Flat records served by the listing API and browsed by discovery pages.
//! The wire format is camelCase JSON. `isFavorited` is client-only state: the
//! API always emits `false` and the discovery controller overlays its own
//! value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Common view over every listing kind
///
/// Used by the discovery controller for favorite overlays and fallback sorting.
pub trait Listing: Clone {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn score(&self) -> i64;
    fn added_date(&self) -> DateTime<Utc>;
    fn is_favorited(&self) -> bool;
    fn set_favorited(&mut self, favorited: bool);
}

/// DJ listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Dj {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    pub genres: Vec<String>,
    pub location: String,
    /// Popularity score, 0-100
    pub score: i64,
    /// Booking rate per hour in whole currency units
    pub hourly_rate: i64,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub added_date: DateTime<Utc>,
    #[serde(default)]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub is_favorited: bool,
}

/// Venue listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub location: String,
    pub capacity: i64,
    #[serde(default)]
    pub venue_type: String,
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    pub genres: Vec<String>,
    /// Average rating scaled to 0-100
    pub score: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    pub added_date: DateTime<Utc>,
    #[serde(default)]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub is_favorited: bool,
}

/// Event listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub venue_name: String,
    pub location: String,
    pub date: DateTime<Utc>,
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    pub genres: Vec<String>,
    pub ticket_price: i64,
    /// Interest score, 0-100
    pub score: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    pub added_date: DateTime<Utc>,
    #[serde(default)]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub is_favorited: bool,
}

/// Recorded DJ set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    pub id: String,
    pub name: String,
    pub dj_name: String,
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    pub genres: Vec<String>,
    pub duration_minutes: i64,
    pub plays: i64,
    /// Listener score, 0-100
    pub score: i64,
    #[serde(default)]
    pub audio_url: Option<String>,
    pub added_date: DateTime<Utc>,
    #[serde(default)]
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub is_favorited: bool,
}

macro_rules! impl_listing {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Listing for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn name(&self) -> &str {
                    &self.name
                }

                fn score(&self) -> i64 {
                    self.score
                }

                fn added_date(&self) -> DateTime<Utc> {
                    self.added_date
                }

                fn is_favorited(&self) -> bool {
                    self.is_favorited
                }

                fn set_favorited(&mut self, favorited: bool) {
                    self.is_favorited = favorited;
                }
            }
        )+
    };
}

impl_listing!(Dj, Venue, Event, Recording);
