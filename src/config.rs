//! Configuration loading.
//!
//! One JSON file, all fields optional. A missing or unreadable file at the
//! default location falls back to defaults; an explicitly passed `--config`
//! path that fails to parse is an error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::style::{StyleId, StyleMap};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Style-map overrides, keyed by wire name (e.g. `"RED_COLOR"`).
    #[serde(default)]
    pub styles: HashMap<String, StyleOverride>,
}

/// Editor behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Load the previously saved document on startup.
    #[serde(default = "default_true")]
    pub restore_on_start: bool,

    /// How many edits the undo stack keeps.
    #[serde(default = "default_undo_depth")]
    pub undo_depth: usize,
}

fn default_true() -> bool {
    true
}

fn default_undo_depth() -> usize {
    200
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            restore_on_start: true,
            undo_depth: default_undo_depth(),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store directory; defaults to the user data directory.
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
}

/// Overrides for how one style renders. Unset fields keep the default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleOverride {
    #[serde(default)]
    pub fg: Option<String>,
    #[serde(default)]
    pub bg: Option<String>,
    #[serde(default)]
    pub bold: Option<bool>,
    #[serde(default)]
    pub underline: Option<bool>,
}

impl Config {
    /// Load from an explicit path. Errors are returned to the caller.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load from the default location, falling back to defaults when the
    /// file is absent or malformed.
    pub fn load_default() -> Config {
        let path = Config::default_path();
        if !path.exists() {
            return Config::default();
        }
        match Config::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {e:#}", path.display());
                Config::default()
            }
        }
    }

    /// The default config file location, under the user config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("jot")
            .join("config.json")
    }

    /// The effective style map: the stock visuals with this config's
    /// overrides applied. Unknown style names and unparsable colors are
    /// skipped with a warning.
    pub fn style_map(&self) -> StyleMap {
        let mut map = StyleMap::default();
        for (name, over) in &self.styles {
            let Some(id) = StyleId::parse(name) else {
                tracing::warn!("Ignoring style override for unknown style {name:?}");
                continue;
            };
            let mut entry = map.get(id);
            if let Some(fg) = &over.fg {
                entry.fg = parse_color(fg);
            }
            if let Some(bg) = &over.bg {
                entry.bg = parse_color(bg);
            }
            if let Some(bold) = over.bold {
                entry.bold = bold;
            }
            if let Some(underline) = over.underline {
                entry.underline = underline;
            }
            map.set(id, entry);
        }
        map
    }
}

fn parse_color(name: &str) -> Option<Color> {
    match name.parse::<Color>() {
        Ok(color) => Some(color),
        Err(_) => {
            tracing::warn!("Ignoring unparsable color {name:?}");
            None
        }
    }
}
