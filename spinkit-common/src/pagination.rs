//! Pagination utilities
//!
//! Page-window math used by the listing API, and the paginated envelope
//! returned to discovery clients.

use serde::{Deserialize, Serialize};

/// Default page size for discovery pages
pub const DEFAULT_PAGE_LIMIT: i64 = 8;

/// Largest page size the API will serve
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Paginated list envelope
///
/// Wire shape: `{ items, totalItems, hasMore, currentPage, totalPages }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total_items: i64,
    pub has_more: bool,
    pub current_page: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    /// Wrap one page of items with the window it was cut from
    pub fn new(items: Vec<T>, total_items: i64, window: Pagination) -> Self {
        Self {
            items,
            total_items,
            has_more: window.page < window.total_pages,
            current_page: window.page,
            total_pages: window.total_pages,
        }
    }
}

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Page size actually used
    pub limit: i64,
    /// Total number of pages
    pub total_pages: i64,
    /// Offset for SQL LIMIT/OFFSET query
    pub offset: i64,
}

/// Clamp a requested page size into `[1, MAX_PAGE_LIMIT]`
pub fn clamp_limit(requested: i64) -> i64 {
    requested.clamp(1, MAX_PAGE_LIMIT)
}

/// Calculate pagination metadata from total results and requested page
///
/// Ensures page is within valid bounds [1, total_pages]
///
/// # Examples
/// ```
/// use spinkit_common::pagination::calculate_pagination;
///
/// // 20 results at 8 per page = 3 pages (8 + 8 + 4)
/// let p = calculate_pagination(20, 2, 8);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 8);
///
/// // Requesting out-of-bounds page gets clamped
/// let p = calculate_pagination(20, 99, 8);
/// assert_eq!(p.page, 3);
/// assert_eq!(p.offset, 16);
/// ```
pub fn calculate_pagination(total_results: i64, requested_page: i64, limit: i64) -> Pagination {
    let limit = clamp_limit(limit);
    let total_pages = (total_results.max(0) + limit - 1) / limit;
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1) * limit;

    Pagination {
        page,
        limit,
        total_pages,
        offset,
    }
}
