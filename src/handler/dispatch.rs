//! Path dispatch module
//!
//! Peels `/api/objects[/{id}]` apart one segment at a time.

use crate::error::ApiError;

/// Resource addressed by a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/api/objects`
    Collection,
    /// `/api/objects/{id}`
    Object(String),
}

/// Normalize a path as a rooted path: resolve `.` and `..`, collapse
/// repeated slashes, drop any trailing slash.
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Split off the first segment of `path`
///
/// Returns the segment without slashes and the remaining path with its
/// leading slash, or `"/"` when nothing remains.
pub fn shift_path(path: &str) -> (String, String) {
    let cleaned = clean_path(path);
    let rest = &cleaned[1..];
    match rest.find('/') {
        Some(i) => (rest[..i].to_string(), rest[i..].to_string()),
        None => (rest.to_string(), "/".to_string()),
    }
}

/// Percent-decode a request path
///
/// Decoding happens before any segment is split off, so `%2F` separates
/// segments just like a literal slash.
pub fn decode_path(path: &str) -> Result<String, ApiError> {
    urlencoding::decode(path)
        .map(std::borrow::Cow::into_owned)
        .map_err(|_| {
            ApiError::MalformedRequestPath(format!("Request path is not valid UTF-8: {path}"))
        })
}

/// Resolve a request path, as received on the wire, to the route it addresses
pub fn route(path: &str) -> Result<Route, ApiError> {
    let path = decode_path(path)?;
    let (head, tail) = shift_path(&path);
    if head != "api" {
        return Err(ApiError::MalformedRequestPath(format!(
            "Only /api is allowed, got: /{head}"
        )));
    }

    let (head, tail) = shift_path(&tail);
    if head != "objects" {
        return Err(ApiError::MalformedRequestPath(format!(
            "Only /api/objects is allowed, got: /api/{head}"
        )));
    }

    let (id, rest) = shift_path(&tail);
    if rest != "/" {
        return Err(ApiError::MalformedRequestPath(format!(
            "Unexpected extra parameters: {rest}"
        )));
    }

    if id.is_empty() {
        Ok(Route::Collection)
    } else {
        Ok(Route::Object(id))
    }
}
