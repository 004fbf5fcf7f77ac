use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Editor tuning read from `config.toml`. Every key is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Initial window size in points.
    pub window_size: [f32; 2],
    /// Images larger than this start zoomed out to fit.
    pub fit_max_size: [f32; 2],
    pub zoom_step: f32,
    pub min_zoom: f32,
    /// List scroll distance per wheel notch.
    pub scroll_step: f32,
    /// Side of the square resize handle, in screen pixels.
    pub handle_size: f32,
    /// Image-space size of boxes created with "New Box".
    pub new_box_size: [f32; 2],
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            window_size: [1600.0, 900.0],
            fit_max_size: [1400.0, 900.0],
            zoom_step: 0.1,
            min_zoom: 0.2,
            scroll_step: 20.0,
            handle_size: 12.0,
            new_box_size: [100.0, 40.0],
        }
    }
}

/// `<config dir>/box-editor/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "box-editor")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn parse_config(content: &str) -> Result<EditorConfig> {
    toml::from_str(content).context("Failed to parse config")
}

/// Loads the config at `path`, falling back to defaults when the file is
/// missing or broken.
pub fn load_config(path: Option<&Path>) -> EditorConfig {
    let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
        return EditorConfig::default();
    };
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return EditorConfig::default();
    }
    let loaded = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))
        .and_then(|content| parse_config(&content));
    match loaded {
        Ok(config) => {
            log::info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("{:#}. Using defaults.", e);
            EditorConfig::default()
        }
    }
}
