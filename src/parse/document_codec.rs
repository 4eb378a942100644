use serde_json::{Map, Value};

use crate::model::id::EntityId;
use crate::model::record::{PageRecord, REQUIRED_KEYS};

/// Error type for document encoding and decoding
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("malformed document at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("invalid document: {0}")]
    Schema(String),
    #[error("could not serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Serialize a page record as a `.task` document.
pub fn encode(record: &PageRecord) -> Result<String, CodecError> {
    let mut text = serde_json::to_string_pretty(record).map_err(CodecError::Serialize)?;
    text.push('\n');
    Ok(text)
}

/// Parse a `.task` document back into a page record.
///
/// Syntax errors are `Parse`; a document that parses but does not have the
/// page shape is `Schema`. Missing ids and parent references are filled in
/// (ids are regenerated on import anyway); missing labels, colors and
/// completion flags take their defaults.
pub fn decode(text: &str) -> Result<PageRecord, CodecError> {
    let mut value: Value = serde_json::from_str(text).map_err(|e| CodecError::Parse {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })?;

    let page = value
        .as_object_mut()
        .ok_or_else(|| CodecError::Schema("top level must be a mapping".into()))?;
    for key in REQUIRED_KEYS {
        if !page.contains_key(*key) {
            return Err(CodecError::Schema(format!("missing required key '{}'", key)));
        }
    }
    fill_missing_ids(page)?;

    serde_json::from_value(value).map_err(|e| CodecError::Schema(e.to_string()))
}

fn fill_missing_ids(page: &mut Map<String, Value>) -> Result<(), CodecError> {
    let page_id = ensure_id(page);
    let categories = page
        .get_mut("categories")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| CodecError::Schema("'categories' must be a sequence".into()))?;

    for (i, category) in categories.iter_mut().enumerate() {
        let category = category
            .as_object_mut()
            .ok_or_else(|| CodecError::Schema(format!("category {} must be a mapping", i)))?;
        let category_id = ensure_id(category);
        category
            .entry("parent")
            .or_insert_with(|| Value::String(page_id.clone()));

        let Some(tasks) = category.get_mut("tasks").and_then(Value::as_array_mut) else {
            continue;
        };
        for task in tasks.iter_mut() {
            if let Some(task) = task.as_object_mut() {
                ensure_id(task);
                task.entry("category_id")
                    .or_insert_with(|| Value::String(category_id.clone()));
            }
        }
    }
    Ok(())
}

/// The record's `id`, generating one when absent. Non-string ids are left
/// for the typed pass to reject.
fn ensure_id(record: &mut Map<String, Value>) -> String {
    let id = record
        .entry("id")
        .or_insert_with(|| Value::String(EntityId::generate().to_string()));
    id.as_str().unwrap_or_default().to_string()
}
