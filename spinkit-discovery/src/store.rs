//! Filter store
//!
//! Per entity kind view state (filters, sort order, card size). A store is an
//! immutable snapshot; every change goes through [`FilterStore::reduce`], which
//! consumes the old snapshot and returns the next one.
//!
//! Snapshots persist as JSON under [`FILTERS_STORAGE_KEY`] in a
//! [`StateStorage`] directory.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use spinkit_common::config::{default_state_dir, TomlConfig};
use spinkit_common::{EntityKind, Error, FilterState, Result, SortOrder};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Storage key for the persisted filter store
pub const FILTERS_STORAGE_KEY: &str = "spinkit-filters";

/// Listing card size on discovery pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// View state for one entity kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityView {
    pub filters: FilterState,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default)]
    pub card_size: CardSize,
}

impl EntityView {
    pub fn defaults(kind: EntityKind) -> Self {
        Self {
            filters: FilterState::defaults(kind),
            sort: SortOrder::default(),
            card_size: CardSize::default(),
        }
    }
}

/// Store updates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    SetFilters { kind: EntityKind, filters: FilterState },
    SetFavoritesOnly { kind: EntityKind, on: bool },
    SetSort { kind: EntityKind, sort: SortOrder },
    SetCardSize { kind: EntityKind, size: CardSize },
    /// Put `initial` back as the kind's filters; sort and card size are kept
    Reset { kind: EntityKind, initial: FilterState },
}

/// Snapshot of every discovery page's view state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterStore {
    djs: EntityView,
    venues: EntityView,
    events: EntityView,
    recordings: EntityView,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self {
            djs: EntityView::defaults(EntityKind::Dj),
            venues: EntityView::defaults(EntityKind::Venue),
            events: EntityView::defaults(EntityKind::Event),
            recordings: EntityView::defaults(EntityKind::Recording),
        }
    }
}

impl FilterStore {
    pub fn view(&self, kind: EntityKind) -> &EntityView {
        match kind {
            EntityKind::Dj => &self.djs,
            EntityKind::Venue => &self.venues,
            EntityKind::Event => &self.events,
            EntityKind::Recording => &self.recordings,
        }
    }

    fn view_mut(&mut self, kind: EntityKind) -> &mut EntityView {
        match kind {
            EntityKind::Dj => &mut self.djs,
            EntityKind::Venue => &mut self.venues,
            EntityKind::Event => &mut self.events,
            EntityKind::Recording => &mut self.recordings,
        }
    }

    /// Apply one action, returning the next snapshot
    ///
    /// Filters whose variant does not belong to `kind` are rejected and the
    /// snapshot comes back unchanged.
    pub fn reduce(mut self, action: FilterAction) -> Self {
        match action {
            FilterAction::SetFilters { kind, filters } | FilterAction::Reset { kind, initial: filters } => {
                if filters.kind() != kind {
                    warn!(
                        "Rejected {} filters for the {} view",
                        filters.kind(),
                        kind
                    );
                    return self;
                }
                self.view_mut(kind).filters = filters;
            }
            FilterAction::SetFavoritesOnly { kind, on } => {
                self.view_mut(kind).filters.set_favorites_only(on);
            }
            FilterAction::SetSort { kind, sort } => {
                self.view_mut(kind).sort = sort;
            }
            FilterAction::SetCardSize { kind, size } => {
                self.view_mut(kind).card_size = size;
            }
        }
        self
    }

    /// Replace any view holding another kind's filters with defaults
    fn validated(mut self) -> Self {
        for kind in EntityKind::ALL {
            if self.view(kind).filters.kind() != kind {
                warn!("Persisted {} view held mismatched filters, using defaults", kind);
                *self.view_mut(kind) = EntityView::defaults(kind);
            }
        }
        self
    }

    /// Load the persisted store
    ///
    /// Missing state yields defaults; unreadable or corrupt state is logged
    /// and also yields defaults.
    pub fn load(storage: &StateStorage) -> Self {
        match storage.load::<FilterStore>(FILTERS_STORAGE_KEY) {
            Ok(Some(store)) => store.validated(),
            Ok(None) => {
                debug!("No persisted filter state, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!("Discarding persisted filter state: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &StateStorage) -> Result<()> {
        storage.save(FILTERS_STORAGE_KEY, self)
    }
}

/// File-backed key/value store for client state
///
/// Each key is one `<key>.json` file in the storage directory.
#[derive(Debug, Clone)]
pub struct StateStorage {
    dir: PathBuf,
}

impl StateStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage under the configured `state_dir`, else the platform data directory
    pub fn from_config(config: &TomlConfig) -> Self {
        match &config.state_dir {
            Some(dir) => Self::new(dir.clone()),
            None => Self::new(default_state_dir()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::InvalidInput(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Read a value, `None` when the key has never been written
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a value, replacing the previous one atomically
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.path(key)?;
        fs::create_dir_all(&self.dir)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path(key)?) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinkit_common::filters::{DjFilters, VenueFilters};
    use spinkit_common::NumericFilter;
    use tempfile::TempDir;

    fn techno_djs() -> FilterState {
        FilterState::Dj(DjFilters {
            genres: vec!["Techno".to_string()],
            score: NumericFilter::between(60, 100),
            ..Default::default()
        })
    }

    #[test]
    fn test_defaults_per_kind() {
        let store = FilterStore::default();
        for kind in EntityKind::ALL {
            assert_eq!(store.view(kind), &EntityView::defaults(kind));
        }
    }

    #[test]
    fn test_set_filters_touches_only_its_kind() {
        let store = FilterStore::default().reduce(FilterAction::SetFilters {
            kind: EntityKind::Dj,
            filters: techno_djs(),
        });

        assert_eq!(store.view(EntityKind::Dj).filters, techno_djs());
        assert_eq!(store.view(EntityKind::Venue), &EntityView::defaults(EntityKind::Venue));
    }

    #[test]
    fn test_mismatched_filters_rejected() {
        let before = FilterStore::default();
        let after = before.clone().reduce(FilterAction::SetFilters {
            kind: EntityKind::Dj,
            filters: FilterState::Venue(VenueFilters::default()),
        });
        assert_eq!(before, after);
    }

    #[test]
    fn test_reset_restores_filters_but_keeps_sort() {
        let store = FilterStore::default()
            .reduce(FilterAction::SetFilters {
                kind: EntityKind::Dj,
                filters: techno_djs(),
            })
            .reduce(FilterAction::SetSort {
                kind: EntityKind::Dj,
                sort: SortOrder::ScoreHigh,
            })
            .reduce(FilterAction::Reset {
                kind: EntityKind::Dj,
                initial: FilterState::defaults(EntityKind::Dj),
            });

        let view = store.view(EntityKind::Dj);
        assert_eq!(view.filters, FilterState::defaults(EntityKind::Dj));
        assert_eq!(view.sort, SortOrder::ScoreHigh);
    }

    #[test]
    fn test_favorites_only_toggle() {
        let store = FilterStore::default().reduce(FilterAction::SetFavoritesOnly {
            kind: EntityKind::Event,
            on: true,
        });
        assert!(store.view(EntityKind::Event).filters.favorites_only());
        assert!(!store.view(EntityKind::Dj).filters.favorites_only());
    }

    #[test]
    fn test_persist_and_reload() {
        let dir = TempDir::new().unwrap();
        let storage = StateStorage::new(dir.path());

        let store = FilterStore::default()
            .reduce(FilterAction::SetFilters {
                kind: EntityKind::Dj,
                filters: techno_djs(),
            })
            .reduce(FilterAction::SetCardSize {
                kind: EntityKind::Recording,
                size: CardSize::Large,
            });
        store.save(&storage).unwrap();

        assert!(dir.path().join("spinkit-filters.json").exists());
        assert_eq!(FilterStore::load(&storage), store);
    }

    #[test]
    fn test_missing_state_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let storage = StateStorage::new(dir.path().join("never-created"));
        assert_eq!(FilterStore::load(&storage), FilterStore::default());
    }

    #[test]
    fn test_corrupt_state_yields_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("spinkit-filters.json"), "{ not json").unwrap();

        let storage = StateStorage::new(dir.path());
        assert_eq!(FilterStore::load(&storage), FilterStore::default());
    }

    #[test]
    fn test_mismatched_persisted_view_replaced() {
        let dir = TempDir::new().unwrap();
        let storage = StateStorage::new(dir.path());

        let mut raw = serde_json::to_value(FilterStore::default()).unwrap();
        raw["djs"]["filters"] = serde_json::to_value(FilterState::defaults(EntityKind::Venue)).unwrap();
        raw["djs"]["sort"] = serde_json::json!("name");
        storage.save(FILTERS_STORAGE_KEY, &raw).unwrap();

        let store = FilterStore::load(&storage);
        assert_eq!(store.view(EntityKind::Dj), &EntityView::defaults(EntityKind::Dj));
    }

    #[test]
    fn test_configured_state_dir_is_used() {
        let dir = TempDir::new().unwrap();
        let config = TomlConfig {
            state_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let storage = StateStorage::from_config(&config);
        assert_eq!(storage.dir(), dir.path());

        FilterStore::default()
            .reduce(FilterAction::SetSort {
                kind: EntityKind::Venue,
                sort: SortOrder::Name,
            })
            .save(&storage)
            .unwrap();
        assert!(dir.path().join("spinkit-filters.json").exists());

        let fallback = StateStorage::from_config(&TomlConfig::default());
        assert_eq!(fallback.dir(), default_state_dir().as_path());
    }

    #[test]
    fn test_storage_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let storage = StateStorage::new(dir.path());
        assert!(storage.save("../escape", &1).is_err());
        assert!(storage.load::<i32>("").is_err());
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let dir = TempDir::new().unwrap();
        let storage = StateStorage::new(dir.path());
        storage.save("pins", &vec!["dj-1"]).unwrap();
        storage.remove("pins").unwrap();
        storage.remove("pins").unwrap();
        assert_eq!(storage.load::<Vec<String>>("pins").unwrap(), None);
    }
}
