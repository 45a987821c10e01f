//! Discovery page controller
//!
//! Holds the page window, the accumulated item list and the favorite overlay
//! for one entity kind. Fetches are split in two halves so the controller
//! stays synchronous:
//!
//! 1. [`DiscoveryController::begin_fetch`] stamps a [`FetchRequest`] with a
//!    new generation and marks the controller as loading.
//! 2. [`DiscoveryController::complete_fetch`] applies the response, but only
//!    if its generation is still the latest. Older responses are dropped.
//!
//! [`DiscoveryController::fetch_page`] drives both halves against a
//! [`ListingSource`].
//!
//! Favorites never reach the server. They live in an overlay keyed by item id
//! and are written onto every item the controller receives.

use spinkit_common::filters::listing_query;
use spinkit_common::pagination::DEFAULT_PAGE_LIMIT;
use spinkit_common::{EntityKind, FilterState, Listing, Paginated, SortOrder};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::source::ListingSource;
use crate::store::{EntityView, FilterAction, FilterStore};

/// Entity-specific ordering applied to the displayed list
pub type ClientSort<T> = fn(&mut [T], SortOrder, &FilterState);

/// Controller configuration supplied by the discovery page
#[derive(Debug, Clone)]
pub struct DiscoveryConfig<T> {
    /// REST path of the listing, e.g. `/api/djs`
    pub api_path: String,
    pub entity_kind: EntityKind,
    /// Filters written back on reset
    pub initial_filters: FilterState,
    /// Falls back to [`fallback_sort`] when unset
    pub client_sort: Option<ClientSort<T>>,
    pub page_limit: i64,
}

impl<T: Listing> DiscoveryConfig<T> {
    /// Defaults for `kind`: its API path, documented filters, [`listing_sort`],
    /// 8 per page
    pub fn new(kind: EntityKind) -> Self {
        Self {
            api_path: kind.api_path().to_string(),
            entity_kind: kind,
            initial_filters: FilterState::defaults(kind),
            client_sort: Some(listing_sort::<T> as ClientSort<T>),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    pub fn with_api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = api_path.into();
        self
    }

    pub fn with_initial_filters(mut self, filters: FilterState) -> Self {
        self.initial_filters = filters;
        self
    }

    pub fn with_client_sort(mut self, sort: ClientSort<T>) -> Self {
        self.client_sort = Some(sort);
        self
    }

    pub fn with_page_limit(mut self, limit: i64) -> Self {
        self.page_limit = limit;
        self
    }
}

/// One outstanding listing page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Monotonic per controller; only the latest is applied
    pub generation: u64,
    pub api_path: String,
    pub page: i64,
    /// Replace the accumulated list instead of appending
    pub reset: bool,
    /// `page`, `limit`, `sortBy`, then filter parameters
    pub query: Vec<(String, String)>,
}

impl FetchRequest {
    /// Value of one query parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Absolute URL under `base_url` with the query string encoded
    pub fn url(&self, base_url: &str) -> Result<reqwest::Url, FetchError> {
        let raw = format!("{}{}", base_url.trim_end_matches('/'), self.api_path);
        reqwest::Url::parse_with_params(&raw, &self.query)
            .map_err(|e| FetchError::Url(format!("{}: {}", raw, e)))
    }
}

/// User-visible message queued for the page to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

/// Name order for [`SortOrder::Name`], newest first otherwise
pub fn fallback_sort<T: Listing>(items: &mut [T], sort: SortOrder, _filters: &FilterState) {
    match sort {
        SortOrder::Name => items.sort_by_key(|item| item.name().to_lowercase()),
        _ => items.sort_by(|a, b| b.added_date().cmp(&a.added_date())),
    }
}

/// Score orders by [`Listing::score`], everything else through [`fallback_sort`]
///
/// Equal scores keep the order they arrived in.
pub fn listing_sort<T: Listing>(items: &mut [T], sort: SortOrder, filters: &FilterState) {
    match sort {
        SortOrder::ScoreHigh => items.sort_by(|a, b| b.score().cmp(&a.score())),
        SortOrder::ScoreLow => items.sort_by_key(|item| item.score()),
        SortOrder::Name | SortOrder::Newest => fallback_sort(items, sort, filters),
    }
}

/// Paginated, filterable, favorite-able listing state for one discovery page
#[derive(Debug)]
pub struct DiscoveryController<T> {
    config: DiscoveryConfig<T>,
    view: EntityView,
    items: Vec<T>,
    displayed: Vec<T>,
    favorites: HashSet<String>,
    current_page: i64,
    total_pages: i64,
    has_more: bool,
    is_loading: bool,
    is_loading_more: bool,
    generation: u64,
    notifications: Vec<Notification>,
}

impl<T: Listing> DiscoveryController<T> {
    pub fn new(config: DiscoveryConfig<T>) -> Self {
        let view = EntityView::defaults(config.entity_kind);
        Self {
            config,
            view,
            items: Vec::new(),
            displayed: Vec::new(),
            favorites: HashSet::new(),
            current_page: 0,
            total_pages: 0,
            has_more: true,
            is_loading: false,
            is_loading_more: false,
            generation: 0,
            notifications: Vec::new(),
        }
    }

    pub fn config(&self) -> &DiscoveryConfig<T> {
        &self.config
    }

    /// Every item fetched for the current filters, in server order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Items after favorites-only filtering and client sorting
    pub fn displayed_items(&self) -> &[T] {
        &self.displayed
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.is_loading_more
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn current_page(&self) -> i64 {
        self.current_page
    }

    pub fn total_pages(&self) -> i64 {
        self.total_pages
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Hand queued notifications to the page, emptying the queue
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Start a fetch of `page` using the store's current view
    pub fn begin_fetch(&mut self, store: &FilterStore, page: i64, reset: bool) -> FetchRequest {
        self.view = store.view(self.config.entity_kind).clone();
        self.generation += 1;

        if reset {
            self.is_loading = true;
            self.is_loading_more = false;
        } else {
            self.is_loading_more = true;
        }

        let request = FetchRequest {
            generation: self.generation,
            api_path: self.config.api_path.clone(),
            page,
            reset,
            query: listing_query(page, self.config.page_limit, self.view.sort, &self.view.filters),
        };
        debug!(
            kind = %self.config.entity_kind,
            generation = request.generation,
            page,
            reset,
            "Begin listing fetch"
        );
        request
    }

    /// Apply the outcome of `request`
    ///
    /// Returns `false` when the response was stale and ignored.
    pub fn complete_fetch(
        &mut self,
        request: &FetchRequest,
        result: Result<Paginated<T>, FetchError>,
    ) -> bool {
        if request.generation != self.generation {
            debug!(
                kind = %self.config.entity_kind,
                stale = request.generation,
                latest = self.generation,
                "Dropping stale listing response"
            );
            return false;
        }

        self.is_loading = false;
        self.is_loading_more = false;

        match result {
            Ok(page) => {
                if request.reset {
                    self.replace_items(page.items);
                } else {
                    self.append_items(page.items);
                }
                self.current_page = page.current_page;
                self.total_pages = page.total_pages;
                self.has_more = page.has_more;
                self.recompute();
            }
            Err(e) => {
                warn!(
                    kind = %self.config.entity_kind,
                    page = request.page,
                    "Listing fetch failed: {}", e
                );
                self.notifications.push(Notification {
                    title: format!("Could not load {} listings", self.config.entity_kind),
                    message: e.to_string(),
                });
                self.has_more = false;
                // Pick up favorite or view changes made while the fetch was out
                self.recompute();
            }
        }
        true
    }

    /// Fetch one page through `source` and apply it
    pub async fn fetch_page<S>(&mut self, source: &S, store: &FilterStore, page: i64, reset: bool) -> bool
    where
        S: ListingSource<T> + ?Sized,
    {
        let request = self.begin_fetch(store, page, reset);
        let result = source.fetch(&request).await;
        self.complete_fetch(&request, result)
    }

    /// Load-more sentinel scrolled into view
    ///
    /// Yields the next page's request only when nothing is in flight and the
    /// server reported more pages.
    pub fn on_sentinel_visible(&mut self, store: &FilterStore) -> Option<FetchRequest> {
        if self.is_loading || self.is_loading_more {
            return None;
        }
        if !self.has_more || self.current_page >= self.total_pages {
            return None;
        }
        Some(self.begin_fetch(store, self.current_page + 1, false))
    }

    /// Sentinel trigger plus fetch; `false` when there was nothing to load
    pub async fn load_more<S>(&mut self, source: &S, store: &FilterStore) -> bool
    where
        S: ListingSource<T> + ?Sized,
    {
        match self.on_sentinel_visible(store) {
            Some(request) => {
                let result = source.fetch(&request).await;
                self.complete_fetch(&request, result)
            }
            None => false,
        }
    }

    /// Flip the favorite flag of one item; `false` if no such item is loaded
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id() == id) else {
            return false;
        };

        let favorited = !item.is_favorited();
        item.set_favorited(favorited);
        if favorited {
            self.favorites.insert(id.to_string());
        } else {
            self.favorites.remove(id);
        }
        self.recompute();
        true
    }

    /// Refetch page 1 with the store's current filters and sort
    pub async fn apply<S>(&mut self, source: &S, store: &FilterStore) -> bool
    where
        S: ListingSource<T> + ?Sized,
    {
        self.fetch_page(source, store, 1, true).await
    }

    /// Write the initial filters back into `store` and start a page-1 fetch
    pub fn begin_reset(&mut self, store: &mut FilterStore) -> FetchRequest {
        let current = std::mem::take(store);
        *store = current.reduce(FilterAction::Reset {
            kind: self.config.entity_kind,
            initial: self.config.initial_filters.clone(),
        });
        info!(kind = %self.config.entity_kind, "Filters reset");
        self.begin_fetch(store, 1, true)
    }

    pub async fn reset<S>(&mut self, source: &S, store: &mut FilterStore) -> bool
    where
        S: ListingSource<T> + ?Sized,
    {
        let request = self.begin_reset(store);
        let result = source.fetch(&request).await;
        self.complete_fetch(&request, result)
    }

    /// Sort or favorites-only changed; redisplay without refetching
    pub fn on_view_changed(&mut self, store: &FilterStore) {
        self.view = store.view(self.config.entity_kind).clone();
        self.recompute();
    }

    /// New page 1: keep favorites only for ids that are still listed
    fn replace_items(&mut self, mut incoming: Vec<T>) {
        let previous = std::mem::take(&mut self.favorites);
        for item in incoming.iter_mut() {
            if previous.contains(item.id()) || item.is_favorited() {
                item.set_favorited(true);
                self.favorites.insert(item.id().to_string());
            }
        }
        self.items = incoming;
    }

    /// Next page: skip ids already accumulated
    fn append_items(&mut self, incoming: Vec<T>) {
        let mut seen: HashSet<String> = self.items.iter().map(|i| i.id().to_string()).collect();
        for mut item in incoming {
            if !seen.insert(item.id().to_string()) {
                continue;
            }
            if self.favorites.contains(item.id()) {
                item.set_favorited(true);
            } else if item.is_favorited() {
                self.favorites.insert(item.id().to_string());
            }
            self.items.push(item);
        }
    }

    /// Rebuild the displayed list; deferred while a reset fetch is in flight
    fn recompute(&mut self) {
        if self.is_loading {
            return;
        }

        let favorites_only = self.view.filters.favorites_only();
        let mut shown: Vec<T> = self
            .items
            .iter()
            .filter(|item| !favorites_only || item.is_favorited())
            .cloned()
            .collect();

        match self.config.client_sort {
            Some(sort) => sort(&mut shown, self.view.sort, &self.view.filters),
            None => fallback_sort(&mut shown, self.view.sort, &self.view.filters),
        }
        self.displayed = shown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use spinkit_common::filters::DjFilters;
    use spinkit_common::pagination::calculate_pagination;
    use spinkit_common::{Dj, NumericFilter};
    use std::sync::Mutex;

    fn dj(n: i64) -> Dj {
        Dj {
            id: format!("dj-{}", n),
            name: format!("DJ {:02}", n),
            genres: vec!["Techno".to_string()],
            location: "Berlin, DE".to_string(),
            score: n,
            hourly_rate: 100,
            bio: String::new(),
            image_url: None,
            added_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::days(100 - n),
            is_favorited: false,
        }
    }

    /// In-memory catalog of `total` DJs, newest first; records every request
    struct FakeSource {
        djs: Vec<Dj>,
        total_pages_override: Option<i64>,
        fail: Mutex<Option<FetchError>>,
        requests: Mutex<Vec<FetchRequest>>,
    }

    impl FakeSource {
        fn new(total: i64) -> Self {
            Self {
                djs: (1..=total).map(dj).collect(),
                total_pages_override: None,
                fail: Mutex::new(None),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn fail_next(&self, err: FetchError) {
            *self.fail.lock().unwrap() = Some(err);
        }

        fn last_request(&self) -> FetchRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl ListingSource<Dj> for FakeSource {
        async fn fetch(&self, request: &FetchRequest) -> Result<Paginated<Dj>, FetchError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(err) = self.fail.lock().unwrap().take() {
                return Err(err);
            }

            let limit: i64 = request.param("limit").unwrap().parse().unwrap();
            let mut window = calculate_pagination(self.djs.len() as i64, request.page, limit);
            if let Some(pages) = self.total_pages_override {
                window.total_pages = pages;
            }
            let items = self
                .djs
                .iter()
                .skip(window.offset as usize)
                .take(window.limit as usize)
                .cloned()
                .collect();
            Ok(Paginated::new(items, self.djs.len() as i64, window))
        }
    }

    fn controller() -> DiscoveryController<Dj> {
        DiscoveryController::new(DiscoveryConfig::new(EntityKind::Dj))
    }

    fn ids(items: &[Dj]) -> Vec<&str> {
        items.iter().map(|d| d.id.as_str()).collect()
    }

    fn page_of(items: Vec<Dj>, current_page: i64, total_pages: i64) -> Paginated<Dj> {
        let total_items = items.len() as i64;
        Paginated {
            items,
            total_items,
            has_more: current_page < total_pages,
            current_page,
            total_pages,
        }
    }

    #[tokio::test]
    async fn test_reset_fetch_sets_window_from_server() {
        let source = FakeSource::new(20);
        let store = FilterStore::default();
        let mut ctl = controller();

        assert!(ctl.fetch_page(&source, &store, 1, true).await);

        assert_eq!(ctl.current_page(), 1);
        assert_eq!(ctl.total_pages(), 3);
        assert!(ctl.has_more());
        assert_eq!(ctl.items().len(), 8);
        assert_eq!(ctl.displayed_items().len(), 8);
        assert!(!ctl.is_loading());
    }

    #[tokio::test]
    async fn test_load_more_accumulates_sixteen_unique() {
        let mut source = FakeSource::new(40);
        source.total_pages_override = Some(5);
        let store = FilterStore::default();
        let mut ctl = controller();

        ctl.fetch_page(&source, &store, 1, true).await;
        assert_eq!(source.last_request().param("page"), Some("1"));
        assert_eq!(source.last_request().param("limit"), Some("8"));

        assert!(ctl.load_more(&source, &store).await);
        assert_eq!(source.last_request().param("page"), Some("2"));

        let mut unique: Vec<&str> = ids(ctl.items());
        unique.sort();
        unique.dedup();
        assert_eq!(ctl.items().len(), 16);
        assert_eq!(unique.len(), 16);
        assert_eq!(ctl.current_page(), 2);
    }

    #[tokio::test]
    async fn test_load_more_until_exhausted() {
        let source = FakeSource::new(20);
        let store = FilterStore::default();
        let mut ctl = controller();

        ctl.fetch_page(&source, &store, 1, true).await;
        let mut loads = 0;
        while ctl.load_more(&source, &store).await {
            loads += 1;
        }

        assert_eq!(loads, 2);
        assert_eq!(ctl.items().len(), 20);
        assert!(!ctl.has_more());
        assert!(ctl.on_sentinel_visible(&store).is_none());
    }

    #[test]
    fn test_append_skips_duplicate_ids() {
        let store = FilterStore::default();
        let mut ctl = controller();

        let req = ctl.begin_fetch(&store, 1, true);
        ctl.complete_fetch(&req, Ok(page_of(vec![dj(1), dj(2)], 1, 3)));

        let req = ctl.on_sentinel_visible(&store).unwrap();
        ctl.complete_fetch(&req, Ok(page_of(vec![dj(2), dj(3)], 2, 3)));

        assert_eq!(ids(ctl.items()), vec!["dj-1", "dj-2", "dj-3"]);
    }

    #[test]
    fn test_sentinel_ignored_while_fetch_in_flight() {
        let store = FilterStore::default();
        let mut ctl = controller();

        let req = ctl.begin_fetch(&store, 1, true);
        assert!(ctl.on_sentinel_visible(&store).is_none());
        ctl.complete_fetch(&req, Ok(page_of(vec![dj(1)], 1, 2)));

        let more = ctl.on_sentinel_visible(&store).unwrap();
        assert!(ctl.is_loading_more());
        assert!(ctl.on_sentinel_visible(&store).is_none());
        assert_eq!(more.page, 2);
        assert!(!more.reset);
    }

    #[test]
    fn test_score_range_in_request() {
        let store = FilterStore::default().reduce(FilterAction::SetFilters {
            kind: EntityKind::Dj,
            filters: FilterState::Dj(DjFilters {
                score: NumericFilter::between(60, 100),
                ..Default::default()
            }),
        });
        let mut ctl = controller();

        let req = ctl.begin_fetch(&store, 1, true);
        let url = req.url("http://localhost:5800").unwrap();

        assert_eq!(url.path(), "/api/djs");
        assert!(url
            .query()
            .unwrap()
            .contains("minScore=60&maxScore=100"));
    }

    #[test]
    fn test_toggle_favorite_flips_only_target() {
        let store = FilterStore::default();
        let mut ctl = controller();
        let req = ctl.begin_fetch(&store, 1, true);
        ctl.complete_fetch(&req, Ok(page_of(vec![dj(1), dj(2), dj(3)], 1, 1)));

        assert!(ctl.toggle_favorite("dj-2"));

        let flags: Vec<bool> = ctl.items().iter().map(|d| d.is_favorited).collect();
        assert_eq!(flags, vec![false, true, false]);
        assert!(ctl.is_favorite("dj-2"));

        assert!(ctl.toggle_favorite("dj-2"));
        assert!(ctl.items().iter().all(|d| !d.is_favorited));
        assert!(!ctl.toggle_favorite("dj-99"));
    }

    #[test]
    fn test_favorites_only_view() {
        let mut store = FilterStore::default();
        let mut ctl = controller();
        let req = ctl.begin_fetch(&store, 1, true);
        ctl.complete_fetch(&req, Ok(page_of(vec![dj(1), dj(2), dj(3)], 1, 1)));
        ctl.toggle_favorite("dj-3");
        ctl.toggle_favorite("dj-1");

        store = store.reduce(FilterAction::SetFavoritesOnly {
            kind: EntityKind::Dj,
            on: true,
        });
        ctl.on_view_changed(&store);

        // Fallback sort is newest first: dj-1 was added last
        assert_eq!(ids(ctl.displayed_items()), vec!["dj-1", "dj-3"]);
        assert_eq!(ctl.items().len(), 3);
    }

    #[test]
    fn test_favorites_merge_forward_on_reset() {
        let store = FilterStore::default();
        let mut ctl = controller();
        let req = ctl.begin_fetch(&store, 1, true);
        ctl.complete_fetch(&req, Ok(page_of(vec![dj(1), dj(2), dj(3)], 1, 1)));
        ctl.toggle_favorite("dj-1");
        ctl.toggle_favorite("dj-3");

        // Refetch after a filter change; dj-3 no longer matches
        let req = ctl.begin_fetch(&store, 1, true);
        ctl.complete_fetch(&req, Ok(page_of(vec![dj(1), dj(4)], 1, 1)));

        assert!(ctl.items()[0].is_favorited);
        assert!(!ctl.items()[1].is_favorited);
        assert!(ctl.is_favorite("dj-1"));
        assert!(!ctl.is_favorite("dj-3"));
    }

    #[test]
    fn test_favorites_carried_onto_appended_pages() {
        let store = FilterStore::default();
        let mut ctl = controller();
        let req = ctl.begin_fetch(&store, 1, true);
        ctl.complete_fetch(&req, Ok(page_of(vec![dj(1)], 1, 2)));
        ctl.toggle_favorite("dj-1");

        let req = ctl.on_sentinel_visible(&store).unwrap();
        ctl.complete_fetch(&req, Ok(page_of(vec![dj(2)], 2, 2)));

        assert!(ctl.items()[0].is_favorited);
        assert!(!ctl.items()[1].is_favorited);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_display_and_stops_loading() {
        let source = FakeSource::new(20);
        let store = FilterStore::default();
        let mut ctl = controller();
        ctl.fetch_page(&source, &store, 1, true).await;
        let before: Vec<Dj> = ctl.displayed_items().to_vec();

        source.fail_next(FetchError::Network("connection refused".to_string()));
        assert!(ctl.load_more(&source, &store).await);

        assert_eq!(ctl.displayed_items(), before.as_slice());
        assert!(!ctl.has_more());
        assert!(!ctl.is_loading_more());

        let notes = ctl.take_notifications();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].message.contains("connection refused"));
        assert!(ctl.notifications().is_empty());

        // No automatic retry
        assert!(!ctl.load_more(&source, &store).await);
        assert_eq!(source.requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_reset_keeps_previous_list() {
        let source = FakeSource::new(20);
        let store = FilterStore::default();
        let mut ctl = controller();
        ctl.fetch_page(&source, &store, 1, true).await;

        source.fail_next(FetchError::Status {
            status: 500,
            message: "boom".to_string(),
        });
        ctl.apply(&source, &store).await;

        assert_eq!(ctl.items().len(), 8);
        assert_eq!(ctl.displayed_items().len(), 8);
        assert!(!ctl.is_loading());
        assert!(!ctl.has_more());
    }

    #[test]
    fn test_stale_response_dropped() {
        let store = FilterStore::default();
        let mut ctl = controller();
        let first = ctl.begin_fetch(&store, 1, true);
        ctl.complete_fetch(&first, Ok(page_of(vec![dj(1)], 1, 3)));

        // Load-more in flight, then a reset overtakes it
        let more = ctl.on_sentinel_visible(&store).unwrap();
        let reset = ctl.begin_fetch(&store, 1, true);
        assert!(!ctl.is_loading_more());

        assert!(ctl.complete_fetch(&reset, Ok(page_of(vec![dj(5), dj(6)], 1, 1))));
        assert!(!ctl.complete_fetch(&more, Ok(page_of(vec![dj(2)], 2, 3))));

        assert_eq!(ids(ctl.items()), vec!["dj-5", "dj-6"]);
        assert!(!ctl.has_more());
    }

    #[tokio::test]
    async fn test_reset_restores_defaults_and_fetches_page_one() {
        let source = FakeSource::new(20);
        let mut store = FilterStore::default().reduce(FilterAction::SetFilters {
            kind: EntityKind::Dj,
            filters: FilterState::Dj(DjFilters {
                genres: vec!["House".to_string()],
                location: "London".to_string(),
                hourly_rate: NumericFilter::AtLeast(300),
                ..Default::default()
            }),
        });
        let mut ctl = controller();
        ctl.fetch_page(&source, &store, 1, true).await;
        ctl.load_more(&source, &store).await;

        assert!(ctl.reset(&source, &mut store).await);

        assert_eq!(store.view(EntityKind::Dj).filters, FilterState::defaults(EntityKind::Dj));
        let req = source.last_request();
        assert_eq!(req.page, 1);
        assert!(req.reset);
        assert_eq!(req.param("genres"), None);
        assert_eq!(req.param("minPrice"), None);
        assert_eq!(ctl.current_page(), 1);
        assert_eq!(ctl.items().len(), 8);
    }

    #[test]
    fn test_reset_uses_configured_initial_filters() {
        let initial = FilterState::Dj(DjFilters {
            location: "Berlin".to_string(),
            ..Default::default()
        });
        let mut ctl: DiscoveryController<Dj> = DiscoveryController::new(
            DiscoveryConfig::new(EntityKind::Dj).with_initial_filters(initial.clone()),
        );
        let mut store = FilterStore::default();

        let req = ctl.begin_reset(&mut store);

        assert_eq!(store.view(EntityKind::Dj).filters, initial);
        assert_eq!(req.param("location"), Some("Berlin"));
    }

    #[test]
    fn test_client_sort_overrides_fallback() {
        fn by_score_desc(items: &mut [Dj], _sort: SortOrder, _filters: &FilterState) {
            items.sort_by(|a, b| b.score.cmp(&a.score));
        }

        let store = FilterStore::default();
        let mut ctl = DiscoveryController::new(
            DiscoveryConfig::new(EntityKind::Dj).with_client_sort(by_score_desc),
        );
        let req = ctl.begin_fetch(&store, 1, true);
        ctl.complete_fetch(&req, Ok(page_of(vec![dj(10), dj(30), dj(20)], 1, 1)));

        assert_eq!(ids(ctl.displayed_items()), vec!["dj-30", "dj-20", "dj-10"]);
        // Accumulated list keeps server order
        assert_eq!(ids(ctl.items()), vec!["dj-10", "dj-30", "dj-20"]);
    }

    #[test]
    fn test_fallback_sort_by_name() {
        let store = FilterStore::default().reduce(FilterAction::SetSort {
            kind: EntityKind::Dj,
            sort: SortOrder::Name,
        });
        let mut ctl = controller();
        let req = ctl.begin_fetch(&store, 1, true);
        assert_eq!(req.param("sortBy"), Some("name"));
        ctl.complete_fetch(&req, Ok(page_of(vec![dj(3), dj(1), dj(2)], 1, 1)));

        assert_eq!(ids(ctl.displayed_items()), vec!["dj-1", "dj-2", "dj-3"]);
    }

    #[test]
    fn test_default_config_orders_by_score() {
        let mut store = FilterStore::default().reduce(FilterAction::SetSort {
            kind: EntityKind::Dj,
            sort: SortOrder::ScoreHigh,
        });
        let mut ctl = controller();
        let req = ctl.begin_fetch(&store, 1, true);
        ctl.complete_fetch(&req, Ok(page_of(vec![dj(30), dj(20), dj(10)], 1, 1)));

        let scores: Vec<i64> = ctl.displayed_items().iter().map(|d| d.score).collect();
        assert_eq!(scores, vec![30, 20, 10]);

        store = store.reduce(FilterAction::SetSort {
            kind: EntityKind::Dj,
            sort: SortOrder::ScoreLow,
        });
        ctl.on_view_changed(&store);
        let scores: Vec<i64> = ctl.displayed_items().iter().map(|d| d.score).collect();
        assert_eq!(scores, vec![10, 20, 30]);
    }

    #[test]
    fn test_equal_scores_keep_server_order() {
        let mut tied = dj(2);
        tied.score = 50;
        let mut other = dj(1);
        other.score = 50;
        let mut items = vec![tied, other];

        listing_sort(&mut items, SortOrder::ScoreHigh, &FilterState::defaults(EntityKind::Dj));

        assert_eq!(ids(&items), vec!["dj-2", "dj-1"]);
    }

    #[test]
    fn test_toggle_during_failed_reset_is_displayed() {
        let store = FilterStore::default();
        let mut ctl = controller();
        let req = ctl.begin_fetch(&store, 1, true);
        ctl.complete_fetch(&req, Ok(page_of(vec![dj(1), dj(2)], 1, 1)));

        let pending = ctl.begin_fetch(&store, 1, true);
        ctl.toggle_favorite("dj-1");
        ctl.complete_fetch(&pending, Err(FetchError::Network("timed out".to_string())));

        assert!(!ctl.is_loading());
        let shown = ctl
            .displayed_items()
            .iter()
            .find(|d| d.id == "dj-1")
            .unwrap();
        assert!(shown.is_favorited);
        assert_eq!(ctl.displayed_items().len(), 2);
    }

    #[test]
    fn test_view_change_defers_during_reset_fetch() {
        let mut store = FilterStore::default();
        let mut ctl = controller();
        let req = ctl.begin_fetch(&store, 1, true);
        ctl.complete_fetch(&req, Ok(page_of(vec![dj(1), dj(2)], 1, 1)));

        let _pending = ctl.begin_fetch(&store, 1, true);
        store = store.reduce(FilterAction::SetFavoritesOnly {
            kind: EntityKind::Dj,
            on: true,
        });
        ctl.on_view_changed(&store);

        assert_eq!(ctl.displayed_items().len(), 2);
    }
}
