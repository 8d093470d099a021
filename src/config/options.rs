// Server construction options

use std::path::PathBuf;

use crate::logger::Logger;
use crate::store::ObjectStore;

pub const DEFAULT_PORT: u16 = 8080;

/// Everything `FakeServer::new` needs, fixed at construction
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Loopback port; 0 picks a free one
    pub port: u16,
    /// Store shared with the caller
    pub objects: ObjectStore,
    /// Start in the background during construction
    pub start: bool,
    /// Verbose request tracing
    pub debug: bool,
    /// Directory served under `/static/`, if any
    pub static_dir: Option<PathBuf>,
    /// Sink for every log line
    pub logger: Logger,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            objects: ObjectStore::new(),
            start: false,
            debug: false,
            static_dir: None,
            logger: Logger::default(),
        }
    }
}
