use serde::{Deserialize, Serialize};

use super::color::Rgba;
use super::page::{DirtyTracking, PageSettings};
use super::registry::RemovalPolicy;

/// Themes offered by the Themes menu
pub const THEMES: &[&str] = &[
    "Dark",
    "Light",
    "Classic",
    "Dark 2",
    "Grey",
    "Dark Grey",
    "Cherry",
    "Purple",
    "Gold",
    "Red",
];

/// Configuration from config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub document: DocumentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_window_size")]
    pub width: u32,
    #[serde(default = "default_window_size")]
    pub height: u32,
    /// Initial color of the category color picker
    #[serde(default = "default_color")]
    pub default_color: Rgba,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            theme: default_theme(),
            width: default_window_size(),
            height: default_window_size(),
            default_color: default_color(),
        }
    }
}

fn default_theme() -> String {
    "Dark".to_string()
}

fn default_window_size() -> u32 {
    500
}

fn default_color() -> Rgba {
    Rgba::PICKER_DEFAULT
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    #[serde(default)]
    pub dirty_tracking: DirtyTracking,
    #[serde(default)]
    pub removal: RemovalPolicy,
}

impl EditorConfig {
    /// Settings handed to every new page
    pub fn page_settings(&self) -> PageSettings {
        PageSettings {
            tracking: self.document.dirty_tracking,
            removal: self.document.removal,
            default_color: self.ui.default_color,
        }
    }
}

/// Case-insensitive lookup of a theme's canonical name
pub fn canonical_theme(name: &str) -> Option<&'static str> {
    THEMES
        .iter()
        .find(|t| t.eq_ignore_ascii_case(name.trim()))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: EditorConfig = toml::from_str("").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.ui.theme, "Dark");
        assert_eq!(config.ui.width, 500);
        assert_eq!(config.page_settings(), PageSettings::default());
    }

    #[test]
    fn document_section_parses() {
        let config: EditorConfig = toml::from_str(
            r#"
[ui]
default_color = [0, 128, 255, 255]

[document]
dirty_tracking = "content"
removal = "strict"
"#,
        )
        .unwrap();
        let settings = config.page_settings();
        assert_eq!(settings.tracking, DirtyTracking::Content);
        assert_eq!(settings.removal, RemovalPolicy::Strict);
        assert_eq!(settings.default_color, Rgba([0, 128, 255, 255]));
    }

    #[test]
    fn theme_lookup_ignores_case() {
        assert_eq!(canonical_theme("dark grey"), Some("Dark Grey"));
        assert_eq!(canonical_theme("Neon"), None);
    }
}
