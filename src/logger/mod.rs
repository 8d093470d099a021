//! Logger module
//!
//! Leveled, formatted line emission for the object server:
//! - `Logger` is a cheap cloneable handle injected through `ServerOptions`
//! - DEBUG lines are only written when the logger was built with `debug`
//! - Output goes to stdout, stderr, a file, or an in-memory buffer

mod format;
pub mod writer;

pub use format::{Level, LogLine};
pub use writer::{LogBuffer, LogTarget};

use std::net::SocketAddr;
use std::sync::Arc;

/// Handle used by every component to write log lines
#[derive(Debug, Clone)]
pub struct Logger {
    target: Arc<LogTarget>,
    debug: bool,
}

impl Logger {
    pub fn new(target: LogTarget, debug: bool) -> Self {
        Self {
            target: Arc::new(target),
            debug,
        }
    }

    /// Logger writing to stderr
    pub fn stderr(debug: bool) -> Self {
        Self::new(LogTarget::Stderr, debug)
    }

    /// Logger writing to an in-memory buffer, returned alongside it
    pub fn capture(debug: bool) -> (Self, LogBuffer) {
        let buffer = LogBuffer::new();
        (Self::new(LogTarget::Memory(buffer.clone()), debug), buffer)
    }

    pub const fn debug_enabled(&self) -> bool {
        self.debug
    }

    pub fn debug(&self, message: &str) {
        if self.debug {
            self.log(Level::Debug, message);
        }
    }

    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    /// Write at `level` regardless of the debug flag
    pub fn log(&self, level: Level, message: &str) {
        self.target.write_line(&LogLine::new(level, message).format());
    }

    pub fn target(&self) -> &LogTarget {
        &self.target
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::stderr(false)
    }
}

pub fn log_server_setup(logger: &Logger, port: u16, debug: bool) {
    logger.info(&format!("Set up fakeserver: port={port}, debug={debug}"));
}

pub fn log_listening(logger: &Logger, addr: &SocketAddr) {
    logger.info(&format!("Listening on: http://{addr}"));
}

pub fn log_connection_error(logger: &Logger, err: &impl std::fmt::Debug) {
    logger.error(&format!("Failed to serve connection: {err:?}"));
}

pub fn log_accept_error(logger: &Logger, err: &std::io::Error) {
    logger.error(&format!("Failed to accept connection: {err}"));
}
