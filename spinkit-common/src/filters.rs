//! Filter and sort types for discovery pages
//!
//! Each entity kind has its own filter shape. `FilterState` is the tagged
//! union over them, and query-string encoding is an exhaustive match on the
//! variant:
//! - array filters (genres) are comma-joined
//! - a two-element numeric range becomes `minX` and `maxX`
//! - a one-element numeric filter becomes a single `minX`
//! - `favorites_only` is client-side and never sent

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Listing entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Dj,
    Venue,
    Event,
    Recording,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Dj,
        EntityKind::Venue,
        EntityKind::Event,
        EntityKind::Recording,
    ];

    /// REST list endpoint for this kind
    pub fn api_path(self) -> &'static str {
        match self {
            EntityKind::Dj => "/api/djs",
            EntityKind::Venue => "/api/venues",
            EntityKind::Event => "/api/events",
            EntityKind::Recording => "/api/recordings",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Dj => "dj",
            EntityKind::Venue => "venue",
            EntityKind::Event => "event",
            EntityKind::Recording => "recording",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric filter with zero, one or two bounds
///
/// Persisted as a plain array (`[]`, `[60]`, `[60, 100]`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<i64>", into = "Vec<i64>")]
pub enum NumericFilter {
    #[default]
    Any,
    AtLeast(i64),
    Between(i64, i64),
}

impl NumericFilter {
    /// Range with bounds in ascending order
    pub fn between(a: i64, b: i64) -> Self {
        NumericFilter::Between(a.min(b), a.max(b))
    }

    /// Whether `value` passes this filter
    pub fn matches(&self, value: i64) -> bool {
        match *self {
            NumericFilter::Any => true,
            NumericFilter::AtLeast(min) => value >= min,
            NumericFilter::Between(min, max) => value >= min && value <= max,
        }
    }

    fn push_params(&self, suffix: &str, out: &mut Vec<(String, String)>) {
        match *self {
            NumericFilter::Any => {}
            NumericFilter::AtLeast(min) => {
                out.push((format!("min{}", suffix), min.to_string()));
            }
            NumericFilter::Between(min, max) => {
                out.push((format!("min{}", suffix), min.to_string()));
                out.push((format!("max{}", suffix), max.to_string()));
            }
        }
    }
}

impl From<Vec<i64>> for NumericFilter {
    fn from(values: Vec<i64>) -> Self {
        match values.as_slice() {
            [] => NumericFilter::Any,
            [min] => NumericFilter::AtLeast(*min),
            [a, .., b] => NumericFilter::between(*a, *b),
        }
    }
}

impl From<NumericFilter> for Vec<i64> {
    fn from(filter: NumericFilter) -> Self {
        match filter {
            NumericFilter::Any => Vec::new(),
            NumericFilter::AtLeast(min) => vec![min],
            NumericFilter::Between(min, max) => vec![min, max],
        }
    }
}

/// DJ discovery filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DjFilters {
    pub genres: Vec<String>,
    pub location: String,
    pub score: NumericFilter,
    pub hourly_rate: NumericFilter,
    pub favorites_only: bool,
}

/// Venue discovery filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueFilters {
    pub genres: Vec<String>,
    pub location: String,
    pub capacity: NumericFilter,
    pub score: NumericFilter,
    pub favorites_only: bool,
}

/// Event discovery filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFilters {
    pub genres: Vec<String>,
    pub location: String,
    pub ticket_price: NumericFilter,
    pub score: NumericFilter,
    pub favorites_only: bool,
}

/// Recording discovery filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingFilters {
    pub genres: Vec<String>,
    /// Substring match on the DJ who recorded the set
    pub dj_name: String,
    pub duration: NumericFilter,
    pub score: NumericFilter,
    pub favorites_only: bool,
}

/// Filter state for one entity kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterState {
    Dj(DjFilters),
    Venue(VenueFilters),
    Event(EventFilters),
    Recording(RecordingFilters),
}

impl FilterState {
    /// Documented defaults: nothing selected, every range open, all items shown
    pub fn defaults(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Dj => FilterState::Dj(DjFilters::default()),
            EntityKind::Venue => FilterState::Venue(VenueFilters::default()),
            EntityKind::Event => FilterState::Event(EventFilters::default()),
            EntityKind::Recording => FilterState::Recording(RecordingFilters::default()),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            FilterState::Dj(_) => EntityKind::Dj,
            FilterState::Venue(_) => EntityKind::Venue,
            FilterState::Event(_) => EntityKind::Event,
            FilterState::Recording(_) => EntityKind::Recording,
        }
    }

    pub fn favorites_only(&self) -> bool {
        match self {
            FilterState::Dj(f) => f.favorites_only,
            FilterState::Venue(f) => f.favorites_only,
            FilterState::Event(f) => f.favorites_only,
            FilterState::Recording(f) => f.favorites_only,
        }
    }

    pub fn set_favorites_only(&mut self, on: bool) {
        match self {
            FilterState::Dj(f) => f.favorites_only = on,
            FilterState::Venue(f) => f.favorites_only = on,
            FilterState::Event(f) => f.favorites_only = on,
            FilterState::Recording(f) => f.favorites_only = on,
        }
    }

    /// Server-side filter parameters (excludes `favorites_only`)
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        match self {
            FilterState::Dj(f) => {
                push_genres(&f.genres, &mut out);
                push_text("location", &f.location, &mut out);
                f.score.push_params("Score", &mut out);
                f.hourly_rate.push_params("Price", &mut out);
            }
            FilterState::Venue(f) => {
                push_genres(&f.genres, &mut out);
                push_text("location", &f.location, &mut out);
                f.capacity.push_params("Capacity", &mut out);
                f.score.push_params("Score", &mut out);
            }
            FilterState::Event(f) => {
                push_genres(&f.genres, &mut out);
                push_text("location", &f.location, &mut out);
                f.ticket_price.push_params("Price", &mut out);
                f.score.push_params("Score", &mut out);
            }
            FilterState::Recording(f) => {
                push_genres(&f.genres, &mut out);
                push_text("djName", &f.dj_name, &mut out);
                f.duration.push_params("Duration", &mut out);
                f.score.push_params("Score", &mut out);
            }
        }
        out
    }
}

fn push_genres(genres: &[String], out: &mut Vec<(String, String)>) {
    let selected: Vec<&str> = genres
        .iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .collect();
    if !selected.is_empty() {
        out.push(("genres".to_string(), selected.join(",")));
    }
}

fn push_text(key: &str, value: &str, out: &mut Vec<(String, String)>) {
    let value = value.trim();
    if !value.is_empty() {
        out.push((key.to_string(), value.to_string()));
    }
}

/// Listing sort order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "name")]
    Name,
    #[default]
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "score_desc")]
    ScoreHigh,
    #[serde(rename = "score_asc")]
    ScoreLow,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Name => "name",
            SortOrder::Newest => "newest",
            SortOrder::ScoreHigh => "score_desc",
            SortOrder::ScoreLow => "score_asc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortOrder::Name),
            "newest" => Ok(SortOrder::Newest),
            "score_desc" => Ok(SortOrder::ScoreHigh),
            "score_asc" => Ok(SortOrder::ScoreLow),
            other => Err(Error::InvalidInput(format!("Unknown sort order: {}", other))),
        }
    }
}

/// Full query for one page of a listing
///
/// `page`, `limit`, `sortBy`, then the filter parameters.
pub fn listing_query(
    page: i64,
    limit: i64,
    sort: SortOrder,
    filters: &FilterState,
) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("page".to_string(), page.to_string()),
        ("limit".to_string(), limit.to_string()),
        ("sortBy".to_string(), sort.as_str().to_string()),
    ];
    pairs.extend(filters.query_params());
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_score_range_splits_into_min_and_max() {
        let filters = FilterState::Dj(DjFilters {
            score: NumericFilter::Between(60, 100),
            ..Default::default()
        });

        let pairs = filters.query_params();
        assert_eq!(param(&pairs, "minScore"), Some("60"));
        assert_eq!(param(&pairs, "maxScore"), Some("100"));
    }

    #[test]
    fn test_single_value_filter_is_min_only() {
        let filters = FilterState::Venue(VenueFilters {
            score: NumericFilter::AtLeast(75),
            ..Default::default()
        });

        let pairs = filters.query_params();
        assert_eq!(param(&pairs, "minScore"), Some("75"));
        assert_eq!(param(&pairs, "maxScore"), None);
    }

    #[test]
    fn test_genres_comma_joined_and_favorites_not_sent() {
        let filters = FilterState::Event(EventFilters {
            genres: vec!["House".into(), " ".into(), "Techno".into()],
            location: "  Berlin ".into(),
            favorites_only: true,
            ..Default::default()
        });

        let pairs = filters.query_params();
        assert_eq!(param(&pairs, "genres"), Some("House,Techno"));
        assert_eq!(param(&pairs, "location"), Some("Berlin"));
        assert!(pairs.iter().all(|(k, _)| !k.contains("avorite")));
    }

    #[test]
    fn test_defaults_emit_no_filter_params() {
        for kind in EntityKind::ALL {
            let defaults = FilterState::defaults(kind);
            assert_eq!(defaults.kind(), kind);
            assert!(defaults.query_params().is_empty());
            assert!(!defaults.favorites_only());
        }
    }

    #[test]
    fn test_listing_query_order() {
        let pairs = listing_query(2, 8, SortOrder::ScoreHigh, &FilterState::defaults(EntityKind::Dj));
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["page", "limit", "sortBy"]);
        assert_eq!(param(&pairs, "sortBy"), Some("score_desc"));
    }

    #[test]
    fn test_numeric_filter_persists_as_array() {
        assert_eq!(serde_json::to_string(&NumericFilter::Any).unwrap(), "[]");
        assert_eq!(serde_json::to_string(&NumericFilter::AtLeast(5)).unwrap(), "[5]");

        let parsed: NumericFilter = serde_json::from_str("[100, 60]").unwrap();
        assert_eq!(parsed, NumericFilter::Between(60, 100));
        assert!(parsed.matches(80));
        assert!(!parsed.matches(59));
    }

    #[test]
    fn test_filter_state_tagged_by_kind() {
        let state = FilterState::Recording(RecordingFilters {
            dj_name: "Nova".into(),
            ..Default::default()
        });
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["kind"], "recording");

        let back: FilterState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_recording_text_filter_is_dj_name() {
        let state = FilterState::Recording(RecordingFilters {
            dj_name: "Nova".into(),
            ..Default::default()
        });
        let query = listing_query(1, 8, SortOrder::Newest, &state);

        assert!(query.contains(&("djName".to_string(), "Nova".to_string())));
        assert!(query.iter().all(|(k, _)| k != "location"));
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("score_asc".parse::<SortOrder>().unwrap(), SortOrder::ScoreLow);
        assert!("popularity".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::default(), SortOrder::Newest);
    }
}
