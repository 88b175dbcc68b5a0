//! Built-in style defaults.
//!
//! The single table of fallback values the resolver applies when neither a
//! state's style nor the Normal state supplies a field. Optionally read from
//! JSON at `~/.config/sprite-button/defaults.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::render::Color;

/// Fallback style values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDefaults {
    /// Font family; `None` selects the system font.
    #[serde(default)]
    pub font_name: Option<String>,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "default_text_color")]
    pub text_color: Color,
    #[serde(default = "default_background")]
    pub background: Color,
}

fn default_font_size() -> f32 { 18.0 }
fn default_text_color() -> Color { Color::BLACK }
fn default_background() -> Color { Color::WHITE }

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            font_name: None,
            font_size: default_font_size(),
            text_color: default_text_color(),
            background: default_background(),
        }
    }
}

impl StyleDefaults {
    /// Default defaults-file location.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sprite-button")
            .join("defaults.json")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load from disk, falling back to built-in values on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(defaults) => defaults,
            Err(e) => {
                if path.exists() {
                    tracing::warn!("Ignoring style defaults {}: {}", path.display(), e);
                }
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defaults.json");
        std::fs::write(&path, r#"{ "font_size": 24.0 }"#).unwrap();
        let defaults = StyleDefaults::load_from(&path).unwrap();
        assert_eq!(defaults.font_size, 24.0);
        assert_eq!(defaults.text_color, Color::BLACK);
        assert_eq!(defaults.background, Color::WHITE);
        assert_eq!(defaults.font_name, None);
    }

    #[test]
    fn malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defaults.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(StyleDefaults::load_or_default(&path), StyleDefaults::default());
        assert_eq!(
            StyleDefaults::load_or_default(&dir.path().join("missing.json")),
            StyleDefaults::default()
        );
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("defaults.json");
        let defaults = StyleDefaults {
            font_name: Some("Arial".into()),
            background: Color::YELLOW,
            ..StyleDefaults::default()
        };
        defaults.save_to(&path).unwrap();
        assert_eq!(StyleDefaults::load_from(&path).unwrap(), defaults);
    }
}
