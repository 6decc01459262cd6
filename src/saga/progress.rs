// src/saga/progress.rs

//! Turning tool output into progress and console events.

/// Receiver of what a run reports while it is going.
pub trait ProgressSink: Send {
    /// Completion in percent, at most 100.
    fn set_percentage(&mut self, percent: u32);
    fn set_console_info(&mut self, line: &str);
}

/// Sink that keeps everything it receives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSink {
    pub percentages: Vec<u32>,
    pub console: Vec<String>,
}

impl ProgressSink for RecordingSink {
    fn set_percentage(&mut self, percent: u32) {
        self.percentages.push(percent);
    }

    fn set_console_info(&mut self, line: &str) {
        self.console.push(line.to_string());
    }
}

/// One classified line of tool output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Progress(u32),
    Console(String),
}

/// Glyphs the tool prints as a busy indicator. Never forwarded.
const SPINNER: [&str; 4] = ["/", "-", "\\", "|"];

/// All ASCII digits of `line` read as one integer.
///
/// `"45%"` gives 45, but so does `"4 of 5 %"`. `None` when there are no
/// digits or the number does not fit.
pub fn parse_percentage(line: &str) -> Option<u32> {
    let digits: String = line.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Classify one line of output.
///
/// Lines containing `%` are progress reports and yield
/// [`RunEvent::Progress`] when a number can be read from them, nothing
/// otherwise. Any other line is trimmed and yields [`RunEvent::Console`],
/// unless it is a spinner glyph. Blank lines are kept.
pub fn classify_line(line: &str) -> Option<RunEvent> {
    if line.contains('%') {
        return parse_percentage(line).map(RunEvent::Progress);
    }
    let trimmed = line.trim();
    if SPINNER.contains(&trimmed) {
        return None;
    }
    Some(RunEvent::Console(trimmed.to_string()))
}

/// Incremental line splitter over raw output bytes.
///
/// `\r` and `\n` both end a line and `\r\n` ends only one. Bytes that are
/// not UTF-8 are replaced with U+FFFD.
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
    after_cr: bool,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return the lines it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &byte in chunk {
            match byte {
                b'\n' if self.after_cr => self.after_cr = false,
                b'\n' | b'\r' => {
                    lines.push(String::from_utf8_lossy(&self.pending).into_owned());
                    self.pending.clear();
                    self.after_cr = byte == b'\r';
                }
                _ => {
                    self.pending.push(byte);
                    self.after_cr = false;
                }
            }
        }
        lines
    }

    /// The unterminated last line, if any.
    pub fn finish(self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.pending).into_owned())
        }
    }
}
