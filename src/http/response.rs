//! HTTP response building module
//!
//! Builders for the handful of response shapes the server writes.
//! Builder failures degrade to a bare response carrying the same status.

use crate::error::ApiError;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use hyper::{Response, StatusCode};
use serde::Serialize;

pub type HttpResponse = Response<Full<Bytes>>;

/// Build a JSON response from any serializable value
pub fn build_json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> HttpResponse {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            return build_text_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Failed to serialize response: {e}"),
            );
        }
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .header(CONTENT_LENGTH, json.len())
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|_| fallback(status))
}

/// Build a plain text response, one message line
pub fn build_text_response(status: StatusCode, message: &str) -> HttpResponse {
    let body = format!("{message}\n");
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header("X-Content-Type-Options", "nosniff")
        .header(CONTENT_LENGTH, body.len())
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| fallback(status))
}

/// Build a response with no body
pub fn build_empty_response(status: StatusCode) -> HttpResponse {
    Response::builder()
        .status(status)
        .header(CONTENT_LENGTH, 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|_| fallback(status))
}

/// Build the response for a failed request
pub fn build_error_response(err: &ApiError) -> HttpResponse {
    let mut response = build_text_response(err.status(), &err.to_string());
    if let ApiError::UnsupportedMethod { allowed, .. } = err {
        if let Ok(value) = allowed.parse() {
            response.headers_mut().insert(ALLOW, value);
        }
    }
    response
}

/// Build 404 Not Found response
pub fn build_404_response() -> HttpResponse {
    build_text_response(StatusCode::NOT_FOUND, "404 page not found")
}

/// Build 301 redirect response
pub fn build_redirect_response(target: &str) -> HttpResponse {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, target)
        .header(CONTENT_LENGTH, 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|_| fallback(StatusCode::MOVED_PERMANENTLY))
}

/// Build a static file response; HEAD keeps the headers but drops the body
pub fn build_file_response(data: Vec<u8>, content_type: &str, is_head: bool) -> HttpResponse {
    let content_length = data.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|_| fallback(StatusCode::OK))
}

fn fallback(status: StatusCode) -> HttpResponse {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}
