//! In-memory JSON object store served over HTTP.
//!
//! A test double for REST clients: documents live in a shared map and are
//! reached through `/api/objects[/{id}]`.
//!
//! ```no_run
//! use fakeserver::{FakeServer, ObjectStore, ServerOptions};
//!
//! # async fn run() -> Result<(), fakeserver::ServerError> {
//! let objects = ObjectStore::new();
//! let mut server = FakeServer::new(ServerOptions {
//!     port: 0,
//!     objects: objects.clone(),
//!     start: true,
//!     ..ServerOptions::default()
//! })
//! .await?;
//! // ... point the client under test at server.local_addr() ...
//! server.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod store;

pub use config::{Config, ServerOptions};
pub use error::{ApiError, ServerError, ServerResult};
pub use logger::Logger;
pub use server::{FakeServer, HttpServer, LifecycleState};
pub use store::{Document, ObjectStore};
