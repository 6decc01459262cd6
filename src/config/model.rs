// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [processing]
/// use_selected = true
/// user_folder = "/home/me/.processing"
///
/// [ui]
/// encoding = "ISO-8859-1"
///
/// [saga]
/// folder = "C:\\Program Files\\SAGA-GIS"
/// log_console = true
/// log_commands = false
/// ```
///
/// Every section is optional. This raw form is turned into validated
/// [`Settings`](crate::config::Settings) via `TryFrom`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub processing: ProcessingSection,

    #[serde(default)]
    pub ui: UiSection,

    #[serde(default)]
    pub saga: SagaSection,
}

/// `[processing]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessingSection {
    /// Export only the selected features when a layer has a selection.
    #[serde(default = "default_true")]
    pub use_selected: bool,

    /// Per-user folder holding the batch script and the processing log.
    #[serde(default)]
    pub user_folder: Option<PathBuf>,

    /// Folder receiving temporary export files.
    #[serde(default)]
    pub temp_folder: Option<PathBuf>,
}

impl Default for ProcessingSection {
    fn default() -> Self {
        Self {
            use_selected: true,
            user_folder: None,
            temp_folder: None,
        }
    }
}

/// `[ui]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct UiSection {
    /// Encoding used when writing attribute text. `"System"` by default.
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

impl Default for UiSection {
    fn default() -> Self {
        Self {
            encoding: default_encoding(),
        }
    }
}

/// `[saga]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SagaSection {
    /// SAGA install folder. On Windows the batch script adds it to `PATH`;
    /// on POSIX a non-empty value is put in front of the child's `PATH`.
    #[serde(default)]
    pub folder: String,

    /// Append console output of each run to the processing log.
    #[serde(default = "default_true")]
    pub log_console: bool,

    /// Append the executed commands to the processing log.
    #[serde(default = "default_true")]
    pub log_commands: bool,
}

impl Default for SagaSection {
    fn default() -> Self {
        Self {
            folder: String::new(),
            log_console: true,
            log_commands: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_encoding() -> String {
    "System".to_string()
}
