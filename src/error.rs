//! Error types
//!
//! `ApiError` covers request-level failures and knows the status it maps
//! to. `ServerError` covers lifecycle failures of `FakeServer`.

use hyper::{Method, StatusCode};
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Path is not `/api/objects[/{id}]`
    #[error("{0}")]
    MalformedRequestPath(String),

    #[error("Method {method} not allowed, expected one of: {allowed}")]
    UnsupportedMethod {
        method: Method,
        allowed: &'static str,
    },

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("POST sent with no id field in the data. Cannot persist this!")]
    MissingIdentifier,

    /// Body is not a JSON object. Reported as 500, unlike `MissingIdentifier`.
    #[error("Unable to parse request body as a JSON object: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedRequestPath(_) | Self::MissingIdentifier => StatusCode::BAD_REQUEST,
            Self::UnsupportedMethod { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::ObjectNotFound(_) => StatusCode::NOT_FOUND,
            Self::MalformedPayload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server is already running")]
    AlreadyRunning,

    #[error("server has been stopped and cannot be restarted")]
    Stopped,

    #[error("accept loop exited before signalling readiness")]
    Readiness,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;
