// Configuration types module
// Settings loaded from file, environment and command line

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Loopback port to listen on
    pub port: u16,
    /// Start serving in the background as soon as the server is built
    pub start: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Verbose request tracing and DEBUG lines
    pub debug: bool,
    /// Append log lines to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct StaticFilesConfig {
    /// Directory served under `/static/`
    #[serde(default)]
    pub dir: Option<String>,
}
