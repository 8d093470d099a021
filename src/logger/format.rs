//! Log line format module
//!
//! Every line written by the server has the shape
//! `YYYY-MM-DD HH:MM:SS LEVEL message`.

use chrono::{DateTime, Local};
use std::fmt;

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Verbose request diagnostics, only written when debug is enabled
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Pad so messages line up across levels
        write!(f, "{:<5}", self.as_str())
    }
}

/// A single log line waiting to be written
#[derive(Debug, Clone)]
pub struct LogLine<'a> {
    pub time: DateTime<Local>,
    pub level: Level,
    pub message: &'a str,
}

impl<'a> LogLine<'a> {
    /// Create a log line stamped with the current local time
    pub fn new(level: Level, message: &'a str) -> Self {
        Self {
            time: Local::now(),
            level,
            message,
        }
    }

    pub fn format(&self) -> String {
        format!(
            "{} {} {}",
            self.time.format("%Y-%m-%d %H:%M:%S"),
            self.level,
            self.message
        )
    }
}
