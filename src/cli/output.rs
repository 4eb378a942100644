use serde::Serialize;

use crate::io::recovery::RecoveryEntry;
use crate::model::page::Page;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct PageJson {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub categories: Vec<CategoryJson>,
}

#[derive(Serialize)]
pub struct CategoryJson {
    pub position: usize,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub complete: bool,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct TaskJson {
    pub position: usize,
    pub label: String,
    pub complete: bool,
}

#[derive(Serialize)]
pub struct ThemeJson {
    pub theme: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub available: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct RecoveryEntryJson {
    pub timestamp: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub body: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Positions are 1-based, matching what the document commands accept.
pub fn page_to_json(page: &Page) -> PageJson {
    PageJson {
        name: page.name.clone(),
        file: page.file_path().map(|p| p.display().to_string()),
        categories: page
            .categories
            .iter()
            .enumerate()
            .map(|(i, c)| CategoryJson {
                position: i + 1,
                label: c.label.clone(),
                color: c.color.to_hex(),
                complete: c.complete,
                tasks: c
                    .tasks
                    .iter()
                    .enumerate()
                    .map(|(j, t)| TaskJson {
                        position: j + 1,
                        label: t.label.clone(),
                        complete: t.complete,
                    })
                    .collect(),
            })
            .collect(),
    }
}

pub fn recovery_to_json(entry: &RecoveryEntry) -> RecoveryEntryJson {
    RecoveryEntryJson {
        timestamp: entry
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        description: entry.description.clone(),
        target: entry
            .fields
            .iter()
            .find(|(k, _)| k == "Target")
            .map(|(_, v)| v.clone()),
        body: entry.body.clone(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a recovery entry: header, fields, then the unsaved document
pub fn format_recovery_entry(entry: &RecoveryEntry) -> Vec<String> {
    let mut lines = vec![format!(
        "{}  {}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.description
    )];
    for (key, value) in &entry.fields {
        lines.push(format!("  {}: {}", key, value));
    }
    if !entry.body.is_empty() {
        lines.push(String::new());
        for line in entry.body.lines() {
            lines.push(format!("    {}", line));
        }
    }
    lines
}

/// Theme list with the current theme starred
pub fn format_theme_list(current: &str, themes: &[&str]) -> Vec<String> {
    themes
        .iter()
        .map(|t| {
            if *t == current {
                format!("* {}", t)
            } else {
                format!("  {}", t)
            }
        })
        .collect()
}
