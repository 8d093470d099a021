//! Server lifecycle
//!
//! `FakeServer` moves through Configured → Running → Stopped. Stopped is
//! terminal. Background start waits for the accept loop to report that it
//! is running instead of sleeping for a fixed delay.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::accept::serve_until;
use super::listener::{create_loopback_listener, loopback_addr};
use crate::config::{AppState, ServerOptions};
use crate::error::{ServerError, ServerResult};
use crate::logger;
use crate::store::ObjectStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Configured,
    Running,
    Stopped,
}

/// Accept loop running on a background task
#[derive(Debug)]
struct BackgroundLoop {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// In-memory object server for exercising REST clients
///
/// Dropping a running server closes its sender half of the shutdown
/// channel, which stops the accept loop as well.
#[derive(Debug)]
pub struct FakeServer {
    state: Arc<AppState>,
    addr: SocketAddr,
    lifecycle: LifecycleState,
    background: Option<BackgroundLoop>,
}

impl FakeServer {
    /// Build a server from `options`, starting it when `options.start` is set
    ///
    /// A missing static directory only disables the mount. The only error
    /// is a failed autostart.
    pub async fn new(options: ServerOptions) -> ServerResult<Self> {
        let state = Arc::new(AppState::new(&options));
        let mut server = Self {
            state,
            addr: loopback_addr(options.port),
            lifecycle: LifecycleState::Configured,
            background: None,
        };

        if options.start {
            server.start_in_background().await?;
        }

        logger::log_server_setup(&server.state.logger, options.port, options.debug);
        Ok(server)
    }

    /// Bind the listener and serve from a background task
    ///
    /// Returns once the accept loop is running.
    pub async fn start_in_background(&mut self) -> ServerResult<()> {
        match self.lifecycle {
            LifecycleState::Configured => {}
            LifecycleState::Running => return Err(ServerError::AlreadyRunning),
            LifecycleState::Stopped => return Err(ServerError::Stopped),
        }

        let addr = self.addr;
        let listener =
            create_loopback_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        let (ready_tx, ready_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(serve_until(
            listener,
            Arc::clone(&self.state),
            Some(ready_tx),
            async move {
                // Resolves on an explicit shutdown or when the sender is dropped
                let _ = shutdown_rx.await;
            },
        ));

        ready_rx.await.map_err(|_| ServerError::Readiness)?;

        logger::log_listening(&self.state.logger, &local_addr);
        self.background = Some(BackgroundLoop {
            local_addr,
            shutdown: shutdown_tx,
            task,
        });
        self.lifecycle = LifecycleState::Running;
        Ok(())
    }

    /// Close the listener and abort in-flight connections
    pub async fn shutdown(&mut self) {
        if let Some(background) = self.background.take() {
            let _ = background.shutdown.send(());
            if let Err(e) = background.task.await {
                self.state
                    .logger
                    .error(&format!("Accept loop ended abnormally: {e}"));
            }
            self.state.logger.info("Server stopped");
        }
        self.lifecycle = LifecycleState::Stopped;
    }

    pub fn running(&self) -> bool {
        self.lifecycle == LifecycleState::Running
    }

    pub const fn lifecycle(&self) -> LifecycleState {
        self.lifecycle
    }

    /// Address actually bound while running; resolves port 0
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.background.as_ref().map(|b| b.local_addr)
    }

    /// The store this server reads and writes
    pub fn objects(&self) -> &ObjectStore {
        &self.state.store
    }

    /// Handle for serving this server's routes in the foreground instead
    pub fn http_server(&self) -> HttpServer {
        HttpServer {
            addr: self.addr,
            state: Arc::clone(&self.state),
        }
    }
}

/// Foreground serving handle sharing a `FakeServer`'s store and routes
#[derive(Debug, Clone)]
pub struct HttpServer {
    addr: SocketAddr,
    state: Arc<AppState>,
}

impl HttpServer {
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Bind and serve until the process ends
    ///
    /// Only returns early when the listener cannot be bound.
    pub async fn listen_and_serve(self) -> ServerResult<()> {
        let addr = self.addr;
        let listener =
            create_loopback_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;
        logger::log_listening(&self.state.logger, &listener.local_addr()?);

        serve_until(listener, self.state, None, std::future::pending()).await;
        Ok(())
    }
}
