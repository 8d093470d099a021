//! HTTP protocol layer module
//!
//! Response builders and content-type detection shared by the object API
//! and the static mount.

pub mod mime;
pub mod response;

pub use response::{
    build_404_response, build_empty_response, build_error_response, build_file_response,
    build_json_response, build_redirect_response, build_text_response, HttpResponse,
};
