// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::model::ConfigFile;
use crate::config::settings::Settings;
use crate::errors::Result;
use crate::paths::default_user_folder;

/// File name of the settings file inside the user folder.
pub const CONFIG_FILE_NAME: &str = "Processing.toml";

/// Load a configuration file from a given path and return the raw `ConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config: ConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a configuration file from path and turn it into validated settings.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Settings> {
    let raw = load_from_path(&path)?;
    let settings = Settings::try_from(raw)?;
    info!(path = ?path.as_ref(), "loaded settings");
    Ok(settings)
}

/// Resolve settings for a run.
///
/// An explicit path must exist. Without one, the default location is used
/// when present, and built-in defaults otherwise.
pub fn load_or_default(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        return load_and_validate(path);
    }

    let path = default_config_path();
    if path.is_file() {
        load_and_validate(&path)
    } else {
        debug!(path = ?path, "no settings file found; using defaults");
        Ok(Settings::default())
    }
}

/// Default settings location: `Processing.toml` in the per-user folder.
pub fn default_config_path() -> PathBuf {
    default_user_folder().join(CONFIG_FILE_NAME)
}
