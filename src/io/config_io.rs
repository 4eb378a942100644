use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::{EditorConfig, canonical_theme};

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml_edit::TomlError),
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),
}

/// Directory holding config.toml and the recovery log, respecting
/// XDG_CONFIG_HOME
pub fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    base.join("tasker")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join("config.toml")
}

/// Read the editor config from `dir`.
/// A missing file gives defaults; a corrupted one is backed up as .bak and
/// replaced by defaults.
pub fn read_config_from(dir: &Path) -> EditorConfig {
    let path = config_path(dir);
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return EditorConfig::default(),
    };
    match toml::from_str::<EditorConfig>(&content) {
        Ok(config) => config,
        Err(e) => {
            let bak = path.with_extension("toml.bak");
            let _ = fs::copy(&path, &bak);
            log::warn!(
                "could not parse {} (backed up as {}): {}",
                path.display(),
                bak.display(),
                e
            );
            EditorConfig::default()
        }
    }
}

/// Read the editor config from the default location.
pub fn read_config() -> EditorConfig {
    read_config_from(&config_dir())
}

/// Switch the theme in `dir`'s config.toml, keeping the rest of the file
/// (comments included) as written. Returns the canonical theme name.
pub fn set_theme(dir: &Path, theme: &str) -> Result<&'static str, ConfigError> {
    let theme = canonical_theme(theme).ok_or_else(|| ConfigError::UnknownTheme(theme.to_string()))?;
    let path = config_path(dir);
    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };

    let mut doc: toml_edit::DocumentMut = text.parse()?;
    if !doc.contains_key("ui") {
        doc["ui"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["ui"]["theme"] = toml_edit::value(theme);

    fs::create_dir_all(dir).map_err(|e| ConfigError::WriteError {
        path: dir.to_path_buf(),
        source: e,
    })?;
    fs::write(&path, doc.to_string()).map_err(|e| ConfigError::WriteError { path, source: e })?;
    Ok(theme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::page::DirtyTracking;
    use tempfile::TempDir;

    #[test]
    fn missing_config_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(read_config_from(tmp.path()), EditorConfig::default());
    }

    #[test]
    fn reads_document_settings() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            config_path(tmp.path()),
            "[document]\ndirty_tracking = \"content\"\n",
        )
        .unwrap();
        let config = read_config_from(tmp.path());
        assert_eq!(config.document.dirty_tracking, DirtyTracking::Content);
    }

    #[test]
    fn corrupted_config_is_backed_up() {
        let tmp = TempDir::new().unwrap();
        fs::write(config_path(tmp.path()), "not valid toml [[[").unwrap();
        assert_eq!(read_config_from(tmp.path()), EditorConfig::default());
        assert!(tmp.path().join("config.toml.bak").exists());
    }

    #[test]
    fn set_theme_preserves_comments() {
        let tmp = TempDir::new().unwrap();
        let original = "# my editor\n[ui]\ntheme = \"Dark\" # night mode\nwidth = 800\n";
        fs::write(config_path(tmp.path()), original).unwrap();

        let theme = set_theme(tmp.path(), "cherry").unwrap();
        assert_eq!(theme, "Cherry");

        let written = fs::read_to_string(config_path(tmp.path())).unwrap();
        assert!(written.starts_with("# my editor\n"));
        assert!(written.contains("width = 800"));
        let config = read_config_from(tmp.path());
        assert_eq!(config.ui.theme, "Cherry");
        assert_eq!(config.ui.width, 800);
    }

    #[test]
    fn set_theme_creates_config() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("tasker");
        set_theme(&dir, "Gold").unwrap();
        assert_eq!(read_config_from(&dir).ui.theme, "Gold");
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            set_theme(tmp.path(), "Neon"),
            Err(ConfigError::UnknownTheme(_))
        ));
        assert!(!config_path(tmp.path()).exists());
    }
}
