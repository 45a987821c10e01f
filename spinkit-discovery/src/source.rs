//! Listing sources
//!
//! The controller never performs I/O itself. It hands a [`FetchRequest`] to a
//! [`ListingSource`] and applies whatever comes back.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use spinkit_common::Paginated;
use std::time::Duration;
use tracing::debug;

use crate::controller::FetchRequest;
use crate::error::FetchError;

/// Something that can answer a listing page request
#[async_trait]
pub trait ListingSource<T>: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<Paginated<T>, FetchError>;
}

/// Listing source backed by the spinkit-api REST service
#[derive(Debug, Clone)]
pub struct HttpListingSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpListingSource {
    /// `base_url` is the service root, e.g. `http://127.0.0.1:5800`
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Pull `{"error": "..."}` out of an error body, falling back to the raw text
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .or_else(|| {
            let text = body.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}

#[async_trait]
impl<T> ListingSource<T> for HttpListingSource
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, request: &FetchRequest) -> Result<Paginated<T>, FetchError> {
        let url = request.url(&self.base_url)?;
        debug!(url = %url, generation = request.generation, "Fetching listing page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        response
            .json::<Paginated<T>>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}
