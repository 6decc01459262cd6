// src/paths.rs

//! Per-user folders and temporary file names.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use uuid::Uuid;

use crate::errors::Result;

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "saga-bridge";
const APP_NAME: &str = "processing";

/// Platform data folder for this user, e.g. `~/.local/share/processing`.
///
/// Falls back to a folder under the system temp dir when the platform
/// cannot report a home directory.
pub fn default_user_folder() -> PathBuf {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("processing-user"))
}

pub fn default_temp_folder() -> PathBuf {
    std::env::temp_dir().join("processing")
}

/// Source of fresh temporary file names.
pub trait TempFiles {
    /// Return a path that does not collide with any earlier call, ending
    /// in `.{extension}`. The file itself is not created.
    fn temp_filename(&self, extension: &str) -> Result<PathBuf>;
}

/// Temp names inside a fixed folder, made unique with a v4 UUID.
#[derive(Debug, Clone)]
pub struct TempFolder {
    root: PathBuf,
}

impl TempFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TempFiles for TempFolder {
    fn temp_filename(&self, extension: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        let name = format!("{}.{}", Uuid::new_v4().simple(), extension);
        Ok(self.root.join(name))
    }
}

/// True when every byte of `source` is ASCII.
///
/// Export tooling downstream cannot round-trip non-ASCII paths, so any
/// other source gets re-exported under a temp name.
pub fn is_ascii_path(source: &str) -> bool {
    source.is_ascii()
}

/// Case-insensitive suffix check. `extension` may be given with or
/// without its leading dot.
pub fn has_extension(source: &str, extension: &str) -> bool {
    let (len, ext_len) = (source.len(), extension.len());
    len >= ext_len
        && source.is_char_boundary(len - ext_len)
        && source[len - ext_len..].eq_ignore_ascii_case(extension)
}
