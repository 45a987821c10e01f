//! Notion integration for admin data export

use serde_json::Value;
use thiserror::Error;

mod client;
mod transform;

pub use client::{DatabaseSummary, NotionClient, NotionConfig, NotionPage};
pub use transform::{transform_properties, PropertyValue};

/// Notion client errors
#[derive(Debug, Error)]
pub enum NotionError {
    #[error("Notion API key not configured")]
    NotConfigured,

    #[error("Notion rejected the API key: {0}")]
    Unauthorized(String),

    #[error("Notion object not found: {0}")]
    NotFound(String),

    #[error("Invalid Notion request: {message}")]
    InvalidRequest { code: String, message: String },

    #[error("Notion API error {status}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl NotionError {
    /// Map a Notion error response (`{status, code, message}`) by status, then code
    pub fn from_response(status: u16, body: &Value) -> Self {
        let code = body
            .get("code")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status));

        if status == 401 || code == "unauthorized" {
            NotionError::Unauthorized(message)
        } else if status == 404 || code == "object_not_found" {
            NotionError::NotFound(message)
        } else if status == 400 || code == "validation_error" || code == "invalid_request" {
            NotionError::InvalidRequest { code, message }
        } else {
            NotionError::Api {
                status,
                code,
                message,
            }
        }
    }

    /// HTTP status returned to admin clients
    pub fn http_status(&self) -> u16 {
        match self {
            NotionError::Unauthorized(_) => 401,
            NotionError::NotFound(_) => 404,
            NotionError::InvalidRequest { .. } => 400,
            NotionError::NotConfigured
            | NotionError::Api { .. }
            | NotionError::Network(_)
            | NotionError::Parse(_) => 500,
        }
    }

    /// Machine-readable code for the error body
    pub fn code(&self) -> &str {
        match self {
            NotionError::NotConfigured => "not_configured",
            NotionError::Unauthorized(_) => "unauthorized",
            NotionError::NotFound(_) => "object_not_found",
            NotionError::InvalidRequest { code, .. } if !code.is_empty() => code.as_str(),
            NotionError::InvalidRequest { .. } => "validation_error",
            NotionError::Api { code, .. } if !code.is_empty() => code.as_str(),
            NotionError::Api { .. } => "internal_server_error",
            NotionError::Network(_) => "network_error",
            NotionError::Parse(_) => "parse_error",
        }
    }
}
