use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- tasker recovery log: documents that could not be saved.
     Each entry holds the full document text; copy it into a .task file
     to restore it. View with: tk recovery
     Safe to delete once you have what you need. -->

---
";

/// A document that failed to save
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

/// Return the path to the recovery log inside `log_dir`.
pub fn recovery_log_path(log_dir: &Path) -> PathBuf {
    log_dir.join("recovery.log")
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl RecoveryEntry {
    /// Format this entry as a markdown block for the recovery log.
    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} | {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.description,
        );

        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        if !self.body.is_empty() {
            out.push_str("\n```json\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push_str("\n---\n");
        out
    }
}

/// Append an entry to the log. Errors are swallowed and logged.
pub fn log_recovery(log_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(log_dir, entry) {
        log::warn!("could not write to recovery log: {}", e);
    }
}

fn log_recovery_inner(log_dir: &Path, entry: RecoveryEntry) -> io::Result<()> {
    std::fs::create_dir_all(log_dir)?;
    let path = recovery_log_path(log_dir);
    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    log::info!("unsaved document written to {}", path.display());
    Ok(())
}

/// Read all entries, most recent first.
pub fn read_recovery_entries(log_dir: &Path) -> Vec<RecoveryEntry> {
    let content = match std::fs::read_to_string(recovery_log_path(log_dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };
    let mut entries = parse_entries(&content);
    entries.reverse();
    entries
}

fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some((timestamp, description)) = line.strip_prefix("## ").and_then(parse_header)
        else {
            continue;
        };

        let mut fields = Vec::new();
        let mut body = String::new();
        let mut in_code_block = false;
        for line in lines.by_ref() {
            if in_code_block {
                if line == "```" {
                    in_code_block = false;
                } else {
                    body.push_str(line);
                    body.push('\n');
                }
                continue;
            }
            if line == "---" {
                break;
            }
            if line.starts_with("```") {
                in_code_block = true;
            } else if let Some((key, value)) = line.split_once(": ") {
                fields.push((key.to_string(), value.to_string()));
            }
        }

        entries.push(RecoveryEntry {
            timestamp,
            description,
            fields,
            body,
        });
    }
    entries
}

/// `<rfc3339 timestamp> | <description>`
fn parse_header(header: &str) -> Option<(DateTime<Utc>, String)> {
    let (ts, description) = header.split_once(" | ")?;
    let timestamp = DateTime::parse_from_rfc3339(ts).ok()?.with_timezone(&Utc);
    Some((timestamp, description.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(description: &str, body: &str) -> RecoveryEntry {
        RecoveryEntry {
            timestamp: Utc::now(),
            description: description.to_string(),
            fields: vec![("Target".to_string(), "/docs/chores.task".to_string())],
            body: body.to_string(),
        }
    }

    #[test]
    fn atomic_write_replaces_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.task");
        atomic_write(&path, b"first").unwrap();
        atomic_write(&path, b"second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn log_and_read_back() {
        let tmp = TempDir::new().unwrap();
        log_recovery(tmp.path(), entry("save failed", "{\n  \"pagename\": \"a\"\n}\n"));
        log_recovery(tmp.path(), entry("save failed again", "{}"));

        let content = std::fs::read_to_string(recovery_log_path(tmp.path())).unwrap();
        assert!(content.starts_with("<!-- tasker recovery log"));
        assert_eq!(content.matches("<!--").count(), 1);

        let entries = read_recovery_entries(tmp.path());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "save failed again");
        assert_eq!(entries[0].body, "{}\n");
        assert_eq!(entries[1].body, "{\n  \"pagename\": \"a\"\n}\n");
        assert_eq!(
            entries[1].fields,
            vec![("Target".to_string(), "/docs/chores.task".to_string())]
        );
    }

    #[test]
    fn missing_log_reads_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(read_recovery_entries(tmp.path()).is_empty());
    }
}
