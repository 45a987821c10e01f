//! Notion property transformer
//!
//! Flattens a page's typed property bag into `name -> scalar | array`.
//! Button, rollup and relation properties are dropped, and so is any kind
//! this module does not recognise. Skipped unknown kinds are logged at debug
//! so an incomplete export can be traced.

use serde::Deserialize;
use serde_json::{json, Map, Number, Value};
use tracing::{debug, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateValue {
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileUrl {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileObject {
    #[serde(default)]
    pub external: Option<FileUrl>,
    #[serde(default)]
    pub file: Option<FileUrl>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UniqueId {
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub number: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormulaValue {
    String { string: Option<String> },
    Number { number: Option<Number> },
    Boolean { boolean: Option<bool> },
    Date { date: Option<DateValue> },
}

/// One Notion property value, tagged by its `type` field
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title { title: Vec<RichText> },
    RichText { rich_text: Vec<RichText> },
    Number { number: Option<Number> },
    Select { select: Option<SelectOption> },
    MultiSelect { multi_select: Vec<SelectOption> },
    Status { status: Option<SelectOption> },
    Date { date: Option<DateValue> },
    Checkbox { checkbox: bool },
    Url { url: Option<String> },
    Email { email: Option<String> },
    PhoneNumber { phone_number: Option<String> },
    Files { files: Vec<FileObject> },
    CreatedTime { created_time: String },
    LastEditedTime { last_edited_time: String },
    CreatedBy { created_by: User },
    LastEditedBy { last_edited_by: User },
    Formula { formula: FormulaValue },
    UniqueId { unique_id: UniqueId },
    Button,
    Rollup,
    Relation,
    #[serde(other)]
    Unsupported,
}

fn plain_text(parts: &[RichText]) -> Value {
    Value::String(parts.iter().map(|p| p.plain_text.as_str()).collect())
}

fn date_value(date: &DateValue) -> Value {
    match &date.end {
        Some(end) => json!({ "start": date.start, "end": end }),
        None => Value::String(date.start.clone()),
    }
}

fn user_value(user: &User) -> Value {
    Value::String(user.name.clone().unwrap_or_else(|| user.id.clone()))
}

impl PropertyValue {
    /// Flat value, or `None` when the kind is dropped from exports
    pub fn flatten(&self) -> Option<Value> {
        let value = match self {
            PropertyValue::Title { title } => plain_text(title),
            PropertyValue::RichText { rich_text } => plain_text(rich_text),
            PropertyValue::Number { number } => number.clone().map_or(Value::Null, Value::Number),
            PropertyValue::Select { select } | PropertyValue::Status { status: select } => select
                .as_ref()
                .map_or(Value::Null, |s| Value::String(s.name.clone())),
            PropertyValue::MultiSelect { multi_select } => Value::Array(
                multi_select
                    .iter()
                    .map(|s| Value::String(s.name.clone()))
                    .collect(),
            ),
            PropertyValue::Date { date } => date.as_ref().map_or(Value::Null, date_value),
            PropertyValue::Checkbox { checkbox } => Value::Bool(*checkbox),
            PropertyValue::Url { url: text }
            | PropertyValue::Email { email: text }
            | PropertyValue::PhoneNumber { phone_number: text } => {
                text.clone().map_or(Value::Null, Value::String)
            }
            PropertyValue::Files { files } => Value::Array(
                files
                    .iter()
                    .filter_map(|f| f.external.as_ref().or(f.file.as_ref()))
                    .map(|u| Value::String(u.url.clone()))
                    .collect(),
            ),
            PropertyValue::CreatedTime { created_time: ts }
            | PropertyValue::LastEditedTime { last_edited_time: ts } => Value::String(ts.clone()),
            PropertyValue::CreatedBy { created_by: user }
            | PropertyValue::LastEditedBy { last_edited_by: user } => user_value(user),
            PropertyValue::Formula { formula } => match formula {
                FormulaValue::String { string } => string.clone().map_or(Value::Null, Value::String),
                FormulaValue::Number { number } => number.clone().map_or(Value::Null, Value::Number),
                FormulaValue::Boolean { boolean } => boolean.map_or(Value::Null, Value::Bool),
                FormulaValue::Date { date } => date.as_ref().map_or(Value::Null, date_value),
            },
            PropertyValue::UniqueId { unique_id } => match (&unique_id.prefix, unique_id.number) {
                (Some(prefix), Some(n)) => Value::String(format!("{}-{}", prefix, n)),
                (None, Some(n)) => json!(n),
                (_, None) => Value::Null,
            },
            PropertyValue::Button
            | PropertyValue::Rollup
            | PropertyValue::Relation
            | PropertyValue::Unsupported => return None,
        };
        Some(value)
    }
}

/// Flatten a page's `properties` object
pub fn transform_properties(properties: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();

    for (name, raw) in properties {
        let property = match PropertyValue::deserialize(raw) {
            Ok(p) => p,
            Err(e) => {
                warn!(property = %name, "Skipping malformed Notion property: {}", e);
                continue;
            }
        };

        match property.flatten() {
            Some(value) => {
                out.insert(name.clone(), value);
            }
            None => {
                let kind = raw.get("type").and_then(Value::as_str).unwrap_or("?");
                debug!(property = %name, kind, "Skipping Notion property");
            }
        }
    }

    out
}
