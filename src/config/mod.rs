// Configuration module entry point
// Layered settings (defaults, file, environment, command line) and the
// options and shared state they turn into

mod options;
mod state;
mod types;

use std::path::PathBuf;

use crate::logger::{LogTarget, Logger};
use crate::store::ObjectStore;

// Re-export public types
pub use options::{ServerOptions, DEFAULT_PORT};
pub use state::AppState;
pub use types::{Config, LoggingConfig, ServerConfig, StaticFilesConfig};

/// Command line values that take precedence over every other source
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub debug: Option<bool>,
    pub static_dir: Option<String>,
    pub log_file: Option<String>,
}

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional. `FAKESERVER_` environment variables override it,
    /// e.g. `FAKESERVER_SERVER__PORT=9090`.
    pub fn load_from(config_path: &str, overrides: &Overrides) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("server.start", false)?
            .set_default("logging.debug", false)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("FAKESERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", overrides.port.map(i64::from))?
            .set_override_option("logging.debug", overrides.debug)?
            .set_override_option("static_files.dir", overrides.static_dir.clone())?
            .set_override_option("logging.log_file", overrides.log_file.clone())?
            .build()?;

        settings.try_deserialize()
    }

    /// Build the logger described by the logging section
    ///
    /// A `log_file` of `-` writes to stdout.
    pub fn build_logger(&self) -> std::io::Result<Logger> {
        let target = match self.logging.log_file.as_deref() {
            Some("-") => LogTarget::Stdout,
            Some(path) => LogTarget::file(path)?,
            None => LogTarget::Stderr,
        };
        Ok(Logger::new(target, self.logging.debug))
    }

    /// Turn loaded settings into server options around `objects`
    pub fn to_options(&self, objects: ObjectStore, logger: Logger) -> ServerOptions {
        ServerOptions {
            port: self.server.port,
            objects,
            start: self.server.start,
            debug: self.logging.debug,
            static_dir: self.static_files.dir.as_ref().map(PathBuf::from),
            logger,
        }
    }
}
