use serde::{Deserialize, Serialize};

use super::color::Rgba;
use super::id::EntityId;

/// Canonical save representation of a page: the top level of a `.task` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageRecord {
    pub pagename: String,
    pub id: EntityId,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    pub categories: Vec<CategoryRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: EntityId,
    /// Hand-edited files may omit it
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub color: Rgba,
    /// Id of the owning page
    pub parent: EntityId,
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: EntityId,
    #[serde(default)]
    pub label: String,
    pub category_id: EntityId,
    #[serde(default)]
    pub complete: bool,
}

/// Top-level keys a document must carry. Missing ids and parent references
/// are filled in by the codec.
pub const REQUIRED_KEYS: &[&str] = &["pagename", "categories"];
