// src/log.rs

//! The processing log shared with the rest of the host.
//!
//! Entries are appended, never rewritten. One call to
//! [`SharedLog::add_to_log`] produces one entry, whatever the number of
//! lines it carries.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;

use crate::errors::{BridgeError, Result};

/// File name of the log inside the user folder.
pub const LOG_FILE_NAME: &str = "processing.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only sink for multi-line log entries.
pub trait SharedLog: Send + Sync {
    fn add_to_log(&self, level: LogLevel, lines: &[String]) -> Result<()>;
}

/// Log stored as `LEVEL|timestamp|line|line...`, one entry per line of the
/// file.
#[derive(Debug)]
pub struct ProcessingLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ProcessingLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `processing.log` inside `user_folder`.
    pub fn in_folder(user_folder: &Path) -> Self {
        Self::new(user_folder.join(LOG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Render one entry. Line breaks inside `lines` are flattened so that an
/// entry always stays on a single line of the file.
pub fn format_entry(level: LogLevel, timestamp: &str, lines: &[String]) -> String {
    let mut entry = format!("{level}|{timestamp}");
    for line in lines {
        entry.push('|');
        entry.push_str(&line.replace(['\r', '\n'], " "));
    }
    entry
}

impl SharedLog for ProcessingLog {
    fn add_to_log(&self, level: LogLevel, lines: &[String]) -> Result<()> {
        let timestamp = Local::now().format("%a %b %d %Y %H:%M:%S").to_string();
        let entry = format_entry(level, &timestamp, lines);

        let _guard = self
            .lock
            .lock()
            .map_err(|_| BridgeError::Process("processing log lock poisoned".to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{entry}")?;
        Ok(())
    }
}

/// In-memory log, for embedding hosts that keep their own log view and for
/// tests.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<(LogLevel, Vec<String>)>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every entry added so far.
    pub fn entries(&self) -> Vec<(LogLevel, Vec<String>)> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SharedLog for MemoryLog {
    fn add_to_log(&self, level: LogLevel, lines: &[String]) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| BridgeError::Process("memory log lock poisoned".to_string()))?;
        entries.push((level, lines.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_format_flattens_lines() {
        let lines = vec!["header".to_string(), "a\nb".to_string()];
        assert_eq!(
            format_entry(LogLevel::Info, "now", &lines),
            "INFO|now|header|a b"
        );
    }

    #[test]
    fn file_log_appends_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let log = ProcessingLog::in_folder(&dir.path().join("user"));

        log.add_to_log(LogLevel::Info, &["first".to_string()]).unwrap();
        log.add_to_log(LogLevel::Error, &["second".to_string(), "x".to_string()])
            .unwrap();

        let text = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("INFO|"));
        assert!(lines[0].ends_with("|first"));
        assert!(lines[1].starts_with("ERROR|"));
        assert!(lines[1].ends_with("|second|x"));
    }

    #[test]
    fn poisoned_lock_is_a_process_error() {
        let log = MemoryLog::new();
        let _ = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _held = log.entries.lock().unwrap();
                    panic!("writer died");
                })
                .join()
        });

        let err = log
            .add_to_log(LogLevel::Info, &["after".to_string()])
            .unwrap_err();
        assert!(matches!(err, BridgeError::Process(_)), "{err:?}");
        assert!(log.entries().is_empty());
    }
}
