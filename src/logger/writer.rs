//! Log writer module
//!
//! Provides thread-safe log writing to stdout/stderr, an append-mode file,
//! or an in-memory buffer that tests can inspect.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Log output target
#[derive(Debug)]
pub enum LogTarget {
    /// Write to stdout, selected with a log file of `-`
    Stdout,
    /// Write to stderr
    Stderr,
    /// Write to file
    File(Mutex<File>),
    /// Keep lines in memory
    Memory(LogBuffer),
}

impl LogTarget {
    /// Open (or create) a log file for appending
    pub fn file(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = open_log_file(path.as_ref())?;
        Ok(Self::File(Mutex::new(file)))
    }

    /// Write one formatted line to the target
    pub fn write_line(&self, line: &str) {
        match self {
            Self::Stdout => {
                println!("{line}");
            }
            Self::Stderr => {
                eprintln!("{line}");
            }
            Self::File(file) => {
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{line}");
                }
            }
            Self::Memory(buffer) => buffer.push(line),
        }
    }
}

/// Shared in-memory line buffer
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    lines: Arc<Mutex<Vec<String>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }

    /// Copy of every line written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Whether any line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines
            .lock()
            .map(|lines| lines.iter().any(|l| l.contains(needle)))
            .unwrap_or(false)
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &Path) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_target() {
        let buffer = LogBuffer::new();
        let target = LogTarget::Memory(buffer.clone());
        target.write_line("first");
        target.write_line("second");
        assert_eq!(buffer.lines(), vec!["first", "second"]);
        assert!(buffer.contains("sec"));
        assert!(!buffer.contains("third"));
    }

    #[test]
    fn test_file_target_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/nested/server.log");

        LogTarget::file(&path).unwrap().write_line("one");
        LogTarget::file(&path).unwrap().write_line("two");

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "one\ntwo\n");
    }
}
