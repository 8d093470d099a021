//! Request handler module
//!
//! Path dispatch, the object CRUD handlers, the tracing middleware and the
//! optional static mount.

pub mod dispatch;
pub mod objects;
pub mod router;
pub mod static_files;
pub mod trace;

// Re-export main entry point
pub use router::handle_request;
pub use static_files::StaticMount;
pub use trace::RequestContext;
