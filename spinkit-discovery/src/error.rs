//! Listing fetch errors

use thiserror::Error;

/// Why a listing page could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response; `message` is the body's `error` field when present
    #[error("Request failed ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid request URL: {0}")]
    Url(String),
}
