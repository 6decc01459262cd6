// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported format '{extension}' for {path:?}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Invalid data in {path:?}: {message}")]
    InvalidData { path: PathBuf, message: String },

    #[error("Process error: {0}")]
    Process(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BridgeError {
    pub fn invalid_data(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidData {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_format(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::UnsupportedFormat { path, extension }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_reports_extension() {
        let err = BridgeError::unsupported_format("/data/roads.gpkg");
        assert!(matches!(
            &err,
            BridgeError::UnsupportedFormat { extension, .. } if extension == "gpkg"
        ));
        assert!(err.to_string().contains("gpkg"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: BridgeError = io_err.into();
        assert!(matches!(err, BridgeError::Io(_)));
    }
}
