//! spinkit-discovery - client-side state for SpinKit discovery pages
//!
//! [`DiscoveryController`] fetches listing pages through a [`ListingSource`],
//! accumulates them for infinite scroll, overlays local favorites, and
//! derives the displayed list from the [`FilterStore`] view for its entity.

pub mod controller;
pub mod error;
pub mod source;
pub mod store;

pub use controller::{
    fallback_sort, listing_sort, ClientSort, DiscoveryConfig, DiscoveryController, FetchRequest,
    Notification,
};
pub use error::FetchError;
pub use source::{HttpListingSource, ListingSource};
pub use store::{CardSize, EntityView, FilterAction, FilterStore, StateStorage, FILTERS_STORAGE_KEY};
