//! Static file serving module
//!
//! Serves files under `/static/` from a directory chosen at construction.
//! Requests handled here bypass the tracing middleware.

use crate::error::ApiError;
use crate::handler::dispatch;
use crate::http::{self, mime, HttpResponse};
use crate::logger::Logger;
use hyper::Method;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

pub const STATIC_PREFIX: &str = "/static/";

const INDEX_FILE: &str = "index.html";

/// A directory mounted under `/static/`
#[derive(Debug, Clone)]
pub struct StaticMount {
    root: PathBuf,
}

impl StaticMount {
    /// Mount `dir` if it exists; otherwise log a warning and skip the mount
    pub fn new(dir: &Path, logger: &Logger) -> Option<Self> {
        if dir.is_dir() {
            logger.info(&format!(
                "Will serve static files in '{}' under {STATIC_PREFIX} path",
                dir.display()
            ));
            Some(Self {
                root: dir.to_path_buf(),
            })
        } else {
            logger.warn(&format!(
                "Not serving {STATIC_PREFIX} because directory '{}' does not exist",
                dir.display()
            ));
            None
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Serve `path` from the mount, or `None` if the path is not under the prefix
pub async fn serve(
    mount: &StaticMount,
    method: &Method,
    path: &str,
    logger: &Logger,
) -> Option<HttpResponse> {
    if path == STATIC_PREFIX.trim_end_matches('/') {
        return Some(http::build_redirect_response(STATIC_PREFIX));
    }
    let relative = path.strip_prefix(STATIC_PREFIX)?;

    let is_head = *method == Method::HEAD;
    if *method != Method::GET && !is_head {
        return Some(http::build_error_response(&ApiError::UnsupportedMethod {
            method: method.clone(),
            allowed: "GET, HEAD",
        }));
    }

    let relative = match dispatch::decode_path(relative) {
        Ok(relative) => relative,
        Err(e) => return Some(http::build_error_response(&e)),
    };

    let response = match load_file(mount.root(), &relative, logger).await {
        Some((content, content_type)) => http::build_file_response(content, content_type, is_head),
        None => http::build_404_response(),
    };
    Some(response)
}

/// Load a file below `root`, falling back to `index.html` for directories
async fn load_file(
    root: &Path,
    relative: &str,
    logger: &Logger,
) -> Option<(Vec<u8>, &'static str)> {
    // Only plain components survive, so `..` can never climb out of root
    let relative: PathBuf = Path::new(relative)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    let mut file_path = root.join(relative);
    if fs::metadata(&file_path).await.ok()?.is_dir() {
        file_path = file_path.join(INDEX_FILE);
    }

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger.warn(&format!(
                "Static directory not accessible '{}': {e}",
                root.display()
            ));
            return None;
        }
    };

    // Missing files are a plain 404
    let file_canonical = fs::canonicalize(&file_path).await.ok()?;
    if !file_canonical.starts_with(&root_canonical) {
        logger.warn(&format!(
            "Path escapes static directory: {}",
            file_canonical.display()
        ));
        return None;
    }

    match fs::read(&file_canonical).await {
        Ok(content) => Some((content, mime::content_type_for(&file_canonical))),
        Err(e) => {
            logger.error(&format!(
                "Failed to read file '{}': {e}",
                file_canonical.display()
            ));
            None
        }
    }
}
