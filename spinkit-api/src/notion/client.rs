//! Notion REST client
//!
//! Only the two calls the admin export needs: database search and database
//! query. Both follow `next_cursor` until Notion reports no more results.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::debug;

use super::NotionError;

/// Notion caps page_size at 100
const PAGE_SIZE: u32 = 100;

/// Connection settings for the Notion API
#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub api_key: String,
    pub base_url: String,
    pub version: String,
}

/// Paginated Notion list response
#[derive(Debug, Deserialize)]
struct NotionList<T> {
    results: Vec<T>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TitleText {
    #[serde(default)]
    plain_text: String,
}

#[derive(Debug, Deserialize)]
struct DatabaseObject {
    id: String,
    #[serde(default)]
    title: Vec<TitleText>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    last_edited_time: Option<String>,
}

/// Database entry returned by `list-databases`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSummary {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub last_edited_time: Option<String>,
}

/// Page object from a database query
#[derive(Debug, Clone, Deserialize)]
pub struct NotionPage {
    pub id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// Notion API client
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    config: NotionConfig,
}

impl NotionClient {
    pub fn new(config: NotionConfig) -> Result<Self, NotionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NotionError::Network(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// All databases shared with the integration
    pub async fn list_databases(&self) -> Result<Vec<DatabaseSummary>, NotionError> {
        let body = json!({ "filter": { "property": "object", "value": "database" } });
        let databases: Vec<DatabaseObject> = self.collect_pages("/search", body).await?;

        Ok(databases
            .into_iter()
            .map(|db| DatabaseSummary {
                title: db.title.iter().map(|t| t.plain_text.as_str()).collect(),
                id: db.id,
                url: db.url,
                last_edited_time: db.last_edited_time,
            })
            .collect())
    }

    /// Every page in a database
    pub async fn query_database(&self, database_id: &str) -> Result<Vec<NotionPage>, NotionError> {
        let path = format!("/databases/{}/query", database_id);
        self.collect_pages(&path, json!({})).await
    }

    async fn collect_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
    ) -> Result<Vec<T>, NotionError> {
        let mut results = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = body.clone();
            request["page_size"] = json!(PAGE_SIZE);
            if let Some(c) = &cursor {
                request["start_cursor"] = json!(c);
            }

            let page: NotionList<T> = self.post(path, &request).await?;
            results.extend(page.results);

            match (page.has_more, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        Ok(results)
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, NotionError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        debug!(url = %url, "Querying Notion API");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("Notion-Version", &self.config.version)
            .json(body)
            .send()
            .await
            .map_err(|e| NotionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            return Err(NotionError::from_response(status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| NotionError::Parse(e.to_string()))
    }
}
