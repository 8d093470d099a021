// Server module entry point
// Listener creation, the accept loop, and the FakeServer lifecycle

mod accept;
pub mod connection;
pub mod instance;
pub mod listener;

pub use instance::{FakeServer, HttpServer, LifecycleState};
pub use listener::{create_loopback_listener, loopback_addr};
