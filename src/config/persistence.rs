//! Settings file load. Credentials never live in this file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::types::ControllerSettings;

/// `settings.json` next to the executable.
pub fn default_settings_path() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.join("settings.json")))
}

/// Load settings from `path`, or from the default location if it exists.
/// An explicit path that is missing is an error; a missing default is not.
pub async fn load_settings(path: Option<&Path>) -> Result<ControllerSettings> {
    let (settings_path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match default_settings_path() {
            Some(p) => (p, false),
            None => return Ok(ControllerSettings::default()),
        },
    };

    if !explicit && !settings_path.exists() {
        debug!("No settings file at {:?}, using defaults", settings_path);
        return Ok(ControllerSettings::default());
    }

    let content = tokio::fs::read_to_string(&settings_path)
        .await
        .with_context(|| format!("Failed to read settings: {:?}", settings_path))?;
    let settings: ControllerSettings = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings JSON: {:?}", settings_path))?;
    settings
        .validate()
        .with_context(|| format!("Invalid settings in {:?}", settings_path))?;

    info!("Loaded settings from: {:?}", settings_path);
    Ok(settings)
}
