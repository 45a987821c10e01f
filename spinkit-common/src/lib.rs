//! # SpinKit Common Library
//!
//! Shared code for the SpinKit API service and the discovery client:
//! - Listing models (DJs, venues, events, recordings)
//! - Paginated envelope and page-window math
//! - Filter and sort types with their query-string encoding
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod pagination;

pub use error::{Error, Result};
pub use filters::{EntityKind, FilterState, NumericFilter, SortOrder};
pub use models::{Dj, Event, Listing, Recording, Venue};
pub use pagination::Paginated;
