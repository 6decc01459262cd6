// src/config/settings.rs

//! Typed, validated settings handed to the exporter and the runner.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::model::ConfigFile;
use crate::errors::{BridgeError, Result};
use crate::formats::TextEncoding;
use crate::paths::{default_temp_folder, default_user_folder};

/// The fixed set of recognized setting keys.
///
/// Names match the keys the processing framework has always used, so
/// `--set SAGA_LOG_CONSOLE=false` works as users expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    UseSelected,
    Encoding,
    SagaFolder,
    SagaLogConsole,
    SagaLogCommands,
    UserFolder,
    TempFolder,
}

impl SettingKey {
    pub const ALL: [SettingKey; 7] = [
        SettingKey::UseSelected,
        SettingKey::Encoding,
        SettingKey::SagaFolder,
        SettingKey::SagaLogConsole,
        SettingKey::SagaLogCommands,
        SettingKey::UserFolder,
        SettingKey::TempFolder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::UseSelected => "USE_SELECTED",
            SettingKey::Encoding => "ENCODING",
            SettingKey::SagaFolder => "SAGA_FOLDER",
            SettingKey::SagaLogConsole => "SAGA_LOG_CONSOLE",
            SettingKey::SagaLogCommands => "SAGA_LOG_COMMANDS",
            SettingKey::UserFolder => "USER_FOLDER",
            SettingKey::TempFolder => "TEMP_FOLDER",
        }
    }
}

impl FromStr for SettingKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        SettingKey::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| format!("unknown setting key '{s}'"))
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated settings.
///
/// Built from a [`ConfigFile`] with `Settings::try_from`, or
/// `Settings::default()` when no config file exists.
#[derive(Debug, Clone)]
pub struct Settings {
    use_selected: bool,
    encoding: TextEncoding,
    saga_folder: String,
    log_console: bool,
    log_commands: bool,
    user_folder: Option<PathBuf>,
    temp_folder: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_valid(ConfigFile::default(), TextEncoding::System)
    }
}

impl TryFrom<ConfigFile> for Settings {
    type Error = BridgeError;

    fn try_from(file: ConfigFile) -> Result<Self> {
        crate::config::validate::validate_config(&file)?;
        let encoding = file.ui.encoding.parse().map_err(BridgeError::Config)?;
        Ok(Self::from_valid(file, encoding))
    }
}

impl Settings {
    fn from_valid(file: ConfigFile, encoding: TextEncoding) -> Self {
        Self {
            use_selected: file.processing.use_selected,
            encoding,
            saga_folder: file.saga.folder,
            log_console: file.saga.log_console,
            log_commands: file.saga.log_commands,
            user_folder: file.processing.user_folder,
            temp_folder: file.processing.temp_folder,
        }
    }

    pub fn use_selected(&self) -> bool {
        self.use_selected
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// SAGA install folder; empty when unset.
    pub fn saga_folder(&self) -> &str {
        &self.saga_folder
    }

    pub fn log_console(&self) -> bool {
        self.log_console
    }

    pub fn log_commands(&self) -> bool {
        self.log_commands
    }

    pub fn user_folder(&self) -> PathBuf {
        self.user_folder.clone().unwrap_or_else(default_user_folder)
    }

    pub fn temp_folder(&self) -> PathBuf {
        self.temp_folder.clone().unwrap_or_else(default_temp_folder)
    }

    /// Apply a single `KEY=VALUE` style override.
    pub fn set(&mut self, key: SettingKey, value: &str) -> Result<()> {
        match key {
            SettingKey::UseSelected => self.use_selected = parse_bool(key, value)?,
            SettingKey::Encoding => {
                self.encoding = value.parse().map_err(BridgeError::Config)?;
            }
            SettingKey::SagaFolder => self.saga_folder = value.to_string(),
            SettingKey::SagaLogConsole => self.log_console = parse_bool(key, value)?,
            SettingKey::SagaLogCommands => self.log_commands = parse_bool(key, value)?,
            SettingKey::UserFolder => self.user_folder = Some(non_empty_path(key, value)?),
            SettingKey::TempFolder => self.temp_folder = Some(non_empty_path(key, value)?),
        }
        Ok(())
    }

    /// Parse and apply an override of the form `KEY=VALUE`.
    pub fn apply_override(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            BridgeError::Config(format!("expected KEY=VALUE, got '{assignment}'"))
        })?;
        let key: SettingKey = key.parse().map_err(BridgeError::Config)?;
        self.set(key, value.trim())
    }
}

fn parse_bool(key: SettingKey, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(BridgeError::Config(format!(
            "{key} expects a boolean, got '{other}'"
        ))),
    }
}

fn non_empty_path(key: SettingKey, value: &str) -> Result<PathBuf> {
    if value.trim().is_empty() {
        return Err(BridgeError::Config(format!("{key} must not be empty")));
    }
    Ok(PathBuf::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_and_log_everything() {
        let settings = Settings::default();
        assert!(settings.use_selected());
        assert_eq!(settings.encoding(), TextEncoding::System);
        assert_eq!(settings.saga_folder(), "");
        assert!(settings.log_console());
        assert!(settings.log_commands());
    }

    #[test]
    fn overrides_use_setting_key_names() {
        let mut settings = Settings::default();
        settings.apply_override("SAGA_LOG_CONSOLE=false").unwrap();
        settings.apply_override("use_selected=0").unwrap();
        settings.apply_override("ENCODING=latin1").unwrap();
        settings.apply_override("SAGA_FOLDER=C:\\saga").unwrap();

        assert!(!settings.log_console());
        assert!(!settings.use_selected());
        assert_eq!(settings.encoding(), TextEncoding::windows_1252());
        assert_eq!(settings.saga_folder(), "C:\\saga");
    }

    #[test]
    fn rejects_unknown_keys_and_bad_values() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.apply_override("NOPE=1"),
            Err(BridgeError::Config(_))
        ));
        assert!(settings.apply_override("USE_SELECTED=maybe").is_err());
        assert!(settings.apply_override("TEMP_FOLDER=").is_err());
        assert!(settings.apply_override("missing-equals").is_err());
    }
}
