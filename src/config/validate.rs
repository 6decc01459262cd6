// src/config/validate.rs

use crate::config::model::ConfigFile;
use crate::errors::{BridgeError, Result};
use crate::formats::TextEncoding;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - `[ui].encoding` names a supported encoding
/// - configured folders are not empty strings
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_encoding(cfg)?;
    validate_folders(cfg)?;
    Ok(())
}

fn validate_encoding(cfg: &ConfigFile) -> Result<()> {
    cfg.ui
        .encoding
        .parse::<TextEncoding>()
        .map(|_| ())
        .map_err(|e| BridgeError::Config(format!("invalid [ui].encoding: {e}")))
}

fn validate_folders(cfg: &ConfigFile) -> Result<()> {
    let folders = [
        ("[processing].user_folder", &cfg.processing.user_folder),
        ("[processing].temp_folder", &cfg.processing.temp_folder),
    ];

    for (name, folder) in folders {
        if let Some(path) = folder {
            if path.as_os_str().is_empty() {
                return Err(BridgeError::Config(format!(
                    "{name} must not be empty when set"
                )));
            }
        }
    }

    Ok(())
}
