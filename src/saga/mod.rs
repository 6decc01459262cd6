// src/saga/mod.rs

//! Running SAGA command batches out of process.
//!
//! A run writes every command into one batch script in the user folder,
//! launches it through the platform shell and turns the merged
//! stdout/stderr stream into progress and console events.
//!
//! - [`script`] composes the script text and owns the per-platform details.
//! - [`progress`] splits and classifies output lines.
//! - [`runner`] ties both to the process and the shared log.

pub mod progress;
pub mod runner;
pub mod script;

pub use progress::{classify_line, parse_percentage, ProgressSink, RecordingSink, RunEvent};
pub use runner::{RunReport, SagaRunner, COMMANDS_LOG_HEADER, CONSOLE_LOG_HEADER};
pub use script::{compose_script, ScriptShell};
