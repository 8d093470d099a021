// Application state module
// Shared by every connection of one server instance

use crate::handler::StaticMount;
use crate::logger::Logger;
use crate::store::ObjectStore;

use super::options::ServerOptions;

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub store: ObjectStore,
    pub logger: Logger,
    /// Verbose request tracing
    pub debug: bool,
    pub static_mount: Option<StaticMount>,
}

impl AppState {
    /// Build state from options; a missing static directory only disables the mount
    pub fn new(options: &ServerOptions) -> Self {
        let static_mount = options
            .static_dir
            .as_deref()
            .and_then(|dir| StaticMount::new(dir, &options.logger));

        Self {
            store: options.objects.clone(),
            logger: options.logger.clone(),
            debug: options.debug,
            static_mount,
        }
    }
}
