// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the filter:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `SAGA_BRIDGE_LOG` environment variable, either a level ("debug") or a
//!    full filter directive ("saga_bridge::saga=trace")
//! 3. default to `info`
//!
//! Logs go to STDERR; stdout carries only command results.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "SAGA_BRIDGE_LOG";

/// Initialise the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(lvl) => level_filter(level_from_log_level(lvl)),
        None => std::env::var(LOG_ENV_VAR)
            .ok()
            .and_then(|s| filter_from_str(&s))
            .unwrap_or_else(|| EnvFilter::new("info")),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}

fn level_filter(level: tracing::Level) -> EnvFilter {
    EnvFilter::new(level.as_str().to_ascii_lowercase())
}

fn filter_from_str(s: &str) -> Option<EnvFilter> {
    match parse_level_str(s) {
        Some(level) => Some(level_filter(level)),
        None => EnvFilter::try_new(s.trim()).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_are_lenient() {
        assert_eq!(parse_level_str(" WARNING "), Some(tracing::Level::WARN));
        assert_eq!(parse_level_str("verbose"), None);
    }

    #[test]
    fn directives_are_accepted() {
        assert!(filter_from_str("saga_bridge::saga=trace").is_some());
        assert!(filter_from_str("debug").is_some());
    }
}
