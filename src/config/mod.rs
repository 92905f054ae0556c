//! Configuration module
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Environment variable pointing at an explicit settings file
pub const SETTINGS_PATH_ENV: &str = "PULSE_SETTINGS_PATH";

/// Load settings from the first existing file, then apply environment overrides
///
/// Lookup order: `$PULSE_SETTINGS_PATH`, `settings.yml`, `config/settings.yml`,
/// then the user config directory. Defaults are used when none exists.
pub fn load() -> Result<Settings> {
    let mut candidates = Vec::new();
    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
        candidates.push(PathBuf::from(path));
    }
    candidates.push(PathBuf::from("settings.yml"));
    candidates.push(PathBuf::from("config/settings.yml"));
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("pulse-aggregator/settings.yml"));
    }

    let mut settings = match candidates.iter().find(|path| path.exists()) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };

    settings.merge_env();
    Ok(settings)
}
