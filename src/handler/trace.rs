//! Request tracing middleware
//!
//! Buffers the request body exactly once and logs every request before it
//! is dispatched. Verbose mode adds the request head, every header, the raw
//! body and a snapshot of the store. Never rejects a request.

use crate::config::AppState;
use crate::logger::{Level, Logger};
use crate::store::ObjectStore;
use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::http::request::Parts;
use hyper::{Method, Request};

/// Everything downstream handlers need from a request
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Path as received, still percent-encoded
    pub path: String,
    pub query: Option<String>,
    pub body: Bytes,
}

impl RequestContext {
    /// Path plus query string, as the client sent them
    pub fn target(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }
}

/// Buffer the body, log the request, and hand back its context
pub async fn trace_request<B>(req: Request<B>, state: &AppState) -> RequestContext
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let logger = &state.logger;
    let (parts, body) = req.into_parts();

    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger.warn(&format!("Failed to read request body: {e}"));
            Bytes::new()
        }
    };

    if state.debug {
        log_verbose(&parts, &body, &state.store, logger).await;
    }

    let path = parts.uri.path().to_string();
    let segments: Vec<&str> = path.split('/').collect();
    logger.info(&format!("Request received: {} {path}", parts.method));
    logger.info(&format!(
        "Split request up into {} parts: {segments:?}",
        segments.len()
    ));

    let query = parts
        .uri
        .query()
        .filter(|q| !q.is_empty())
        .map(ToString::to_string);
    if let Some(q) = &query {
        logger.info(&format!("Query string: {q}"));
    }

    RequestContext {
        method: parts.method,
        path,
        query,
        body,
    }
}

async fn log_verbose(parts: &Parts, body: &Bytes, store: &ObjectStore, logger: &Logger) {
    logger.log(Level::Debug, &format!("Received request: {parts:?}"));

    logger.log(Level::Debug, "Headers:");
    // Header names are already lower-case; repeated headers yield one entry per value
    for (name, value) in &parts.headers {
        logger.log(
            Level::Debug,
            &format!("  {name}: {}", String::from_utf8_lossy(value.as_bytes())),
        );
    }

    logger.log(
        Level::Debug,
        &format!("BODY: {}", String::from_utf8_lossy(body)),
    );

    logger.log(Level::Debug, "IDs and objects:");
    for (id, document) in store.snapshot().await {
        let rendered = serde_json::to_string(&document).unwrap_or_default();
        logger.log(Level::Debug, &format!("  {id}: {rendered}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerOptions;
    use crate::logger::Logger;
    use http_body_util::Full;
    use serde_json::json;

    fn state(debug: bool) -> (AppState, crate::logger::LogBuffer) {
        let (logger, buffer) = Logger::capture(false);
        let options = ServerOptions {
            debug,
            logger,
            ..ServerOptions::default()
        };
        (AppState::new(&options), buffer)
    }

    fn request(method: Method, uri: &str, body: &'static str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("X-Custom", "one")
            .header("x-custom", "two")
            .body(Full::new(Bytes::from(body)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_context_carries_body_and_query() {
        let (state, _) = state(false);
        let ctx = trace_request(
            request(Method::POST, "/api/objects?verbose=1", r#"{"id":"1"}"#),
            &state,
        )
        .await;

        assert_eq!(ctx.method, Method::POST);
        assert_eq!(ctx.path, "/api/objects");
        assert_eq!(ctx.query.as_deref(), Some("verbose=1"));
        assert_eq!(ctx.target(), "/api/objects?verbose=1");
        assert_eq!(&ctx.body[..], br#"{"id":"1"}"#);
    }

    #[tokio::test]
    async fn test_baseline_logging() {
        let (state, buffer) = state(false);
        trace_request(request(Method::GET, "/api/objects/7?a=b", ""), &state).await;

        assert!(buffer.contains("Request received: GET /api/objects/7"));
        assert!(buffer.contains(r#"Split request up into 4 parts: ["", "api", "objects", "7"]"#));
        assert!(buffer.contains("Query string: a=b"));
        assert!(!buffer.contains("Headers:"));
    }

    #[tokio::test]
    async fn test_path_kept_escaped() {
        let (state, buffer) = state(false);
        let ctx = trace_request(request(Method::GET, "/api/objects/a%20b", ""), &state).await;

        assert_eq!(ctx.path, "/api/objects/a%20b");
        assert_eq!(ctx.target(), "/api/objects/a%20b");
        assert!(buffer.contains("Request received: GET /api/objects/a%20b"));
    }

    #[tokio::test]
    async fn test_verbose_logging() {
        let (state, buffer) = state(true);
        state
            .store
            .put("seed", json!({"id": "seed"}).as_object().unwrap().clone())
            .await;

        trace_request(request(Method::PUT, "/api/objects/seed", r#"{"x":1}"#), &state).await;

        assert!(buffer.contains("Received request:"));
        assert!(buffer.contains("  x-custom: one"));
        assert!(buffer.contains("  x-custom: two"));
        assert!(buffer.contains(r#"BODY: {"x":1}"#));
        assert!(buffer.contains(r#"  seed: {"id":"seed"}"#));
    }
}
