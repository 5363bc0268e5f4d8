//! `schedview.toml` configuration
//!
//! ```toml
//! [view]
//! mode = "week"
//! legend = true
//! theme = "light"
//! title = "Cronograma"
//!
//! [layout]
//! viewport_width = 1280
//! container_height = 600
//! table_min_width = 300
//! table_max_percent = 60
//!
//! [preferences]
//! path = "schedview-prefs.json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use schedview_core::ViewMode;
use schedview_render::PaneLayout;

/// File looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "schedview.toml";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub view: ViewConfig,
    pub layout: LayoutConfig,
    pub preferences: PreferencesConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    pub mode: ViewMode,
    pub legend: bool,
    pub theme: String,
    pub title: Option<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            mode: ViewMode::default(),
            legend: true,
            theme: "light".into(),
            title: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub viewport_width: u32,
    pub container_height: u32,
    pub table_min_width: u32,
    pub table_max_percent: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let layout = PaneLayout::default();
        Self {
            viewport_width: layout.viewport_width,
            container_height: layout.container_height,
            table_min_width: layout.table_min_width,
            table_max_percent: layout.table_max_percent,
        }
    }
}

impl From<LayoutConfig> for PaneLayout {
    fn from(config: LayoutConfig) -> Self {
        Self {
            viewport_width: config.viewport_width,
            container_height: config.container_height,
            table_min_width: config.table_min_width,
            table_max_percent: config.table_max_percent.min(100),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreferencesConfig {
    /// JSON file backing the column preference store
    pub path: PathBuf,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("schedview-prefs.json"),
        }
    }
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).context("invalid configuration")
    }

    /// Load `path`, or `schedview.toml` from the working directory when it
    /// exists, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let source = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config = Self::from_toml_str(&source)
            .with_context(|| format!("in {}", path.display()))?;

        // Relative preference paths are relative to the config file.
        if config.preferences.path.is_relative() {
            if let Some(dir) = path.parent() {
                config.preferences.path = dir.join(&config.preferences.path);
            }
        }
        tracing::debug!(config = %path.display(), "configuration loaded");
        Ok(config)
    }
}
