//! Pipeline progress logging.
//!
//! The pipelines narrate what they do (detected encoding, row counts,
//! dropped-row warnings, totals) as prefixed lines on stdout. There is no
//! machine-readable contract for this output.

use serde::{Deserialize, Serialize};

/// Log level for display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Print the entry to stdout.
    pub fn emit(&self) {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        println!("{}{} {}", indent, prefix, self.message);
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LogEntry::info(msg).emit();
}

pub fn log_success(msg: impl Into<String>) {
    LogEntry::success(msg).emit();
}

pub fn log_warning(msg: impl Into<String>) {
    LogEntry::warning(msg).emit();
}

pub fn log_error(msg: impl Into<String>) {
    LogEntry::error(msg).emit();
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LogEntry::info(msg).with_indent(indent).emit();
}
