//! Per-export operation log
//!
//! Each export writes into its own [`ExportLog`]. Entries are mirrored to
//! `tracing` as they are recorded, and the rendered text is what the web
//! surface shows to the user. No global logger state is touched, so two
//! exports never see each other's output.

use tracing::{debug, error, info, warn};

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// One recorded message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// Ordered log of one export run
#[derive(Debug, Clone, Default)]
pub struct ExportLog {
    entries: Vec<LogEntry>,
}

impl ExportLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("{}", message);
        self.push(LogLevel::Debug, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.push(LogLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.push(LogLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!("{}", message);
        self.push(LogLevel::Error, message);
    }

    /// Record the combined output of a git invocation; blank output is skipped
    pub fn command_output(&mut self, output: &str) {
        let trimmed = output.trim_end();
        if !trimmed.is_empty() {
            self.debug(trimmed.to_string());
        }
    }

    fn push(&mut self, level: LogLevel, message: String) {
        self.entries.push(LogEntry { level, message });
    }

    /// Log text, one message per line, in recording order
    pub fn render(&self) -> String {
        let mut text = String::new();
        for entry in &self.entries {
            text.push_str(&entry.message);
            text.push('\n');
        }
        text
    }
}
