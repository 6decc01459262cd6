// src/console.rs

//! Terminal rendering of a running batch.

use indicatif::{ProgressBar, ProgressStyle};

use crate::saga::ProgressSink;

const TEMPLATE: &str = "{spinner} [{bar:40}] {pos:>3}% {wide_msg}";

/// Progress bar on stderr; console lines are printed above it.
pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }

    /// Bar that draws nothing, for non-interactive output.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ConsoleProgress {
    fn set_percentage(&mut self, percent: u32) {
        self.bar.set_position(u64::from(percent));
    }

    fn set_console_info(&mut self, line: &str) {
        self.bar.set_message(line.to_string());
        self.bar.println(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_bar_tracks_position() {
        let mut progress = ConsoleProgress::hidden();
        progress.set_percentage(42);
        progress.set_console_info("step");
        assert_eq!(progress.bar.position(), 42);
        progress.finish();
    }
}
