//! Admin data-export endpoints backed by Notion
//!
//! Both routes need the server-side Notion API key. Without it they answer
//! 500 with a configuration error instead of calling Notion.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::notion::{transform_properties, DatabaseSummary, NotionClient, NotionError};
use crate::AppState;

fn notion(state: &AppState) -> Result<&NotionClient, NotionError> {
    state.notion.as_ref().ok_or(NotionError::NotConfigured)
}

/// GET /api/admin/notion/list-databases
pub async fn list_databases(State(state): State<AppState>) -> ApiResult<Json<Vec<DatabaseSummary>>> {
    let databases = notion(&state)?.list_databases().await?;
    info!("Listed {} Notion databases", databases.len());
    Ok(Json(databases))
}

/// GET /api/admin/notion/export-database/:database_id
///
/// One flat record per database page: `id` plus the transformed properties.
pub async fn export_database(
    State(state): State<AppState>,
    Path(database_id): Path<String>,
) -> ApiResult<Json<Vec<Map<String, Value>>>> {
    // Notion accepts dashed or 32-hex ids; anything else is rejected here
    let id = Uuid::parse_str(database_id.trim())
        .map_err(|_| ApiError::BadRequest(format!("Invalid database id: {}", database_id)))?;

    let pages = notion(&state)?.query_database(&id.to_string()).await?;

    let records: Vec<Map<String, Value>> = pages
        .iter()
        .map(|page| {
            let mut record = Map::new();
            record.insert("id".to_string(), Value::String(page.id.clone()));
            record.extend(transform_properties(&page.properties));
            record
        })
        .collect();

    info!(database = %id, "Exported {} Notion pages", records.len());
    Ok(Json(records))
}
