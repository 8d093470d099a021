//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: static mount first, then the
//! tracing middleware, then the `/api/objects` dispatch table.

use crate::config::AppState;
use crate::error::ApiError;
use crate::handler::dispatch::{self, Route};
use crate::handler::objects;
use crate::handler::static_files;
use crate::handler::trace::{self, RequestContext};
use crate::http::{self, HttpResponse};
use hyper::body::Body;
use hyper::{Method, Request};
use std::convert::Infallible;
use std::sync::Arc;

const COLLECTION_METHODS: &str = "GET, POST";
const OBJECT_METHODS: &str = "GET, PUT, DELETE";

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<HttpResponse, Infallible>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    if let Some(mount) = &state.static_mount {
        if let Some(response) =
            static_files::serve(mount, req.method(), req.uri().path(), &state.logger).await
        {
            return Ok(response);
        }
    }

    let ctx = trace::trace_request(req, &state).await;
    Ok(dispatch_request(&ctx, &state).await)
}

/// Route an already-traced request and turn failures into responses
pub async fn dispatch_request(ctx: &RequestContext, state: &AppState) -> HttpResponse {
    match route_request(ctx, state).await {
        Ok(response) => response,
        Err(err) => {
            state
                .logger
                .info(&format!("{} {}: {} {err}", ctx.method, ctx.target(), err.status()));
            http::build_error_response(&err)
        }
    }
}

async fn route_request(ctx: &RequestContext, state: &AppState) -> Result<HttpResponse, ApiError> {
    let store = &state.store;
    let logger = &state.logger;

    match dispatch::route(&ctx.path)? {
        Route::Collection => match ctx.method {
            Method::GET => Ok(objects::list_objects(store, logger).await),
            Method::POST => objects::create_object(&ctx.body, store, logger).await,
            _ => Err(unsupported(&ctx.method, COLLECTION_METHODS)),
        },
        Route::Object(id) => match ctx.method {
            Method::GET => objects::get_object(&id, store, logger).await,
            Method::PUT => objects::update_object(&id, &ctx.body, store, logger).await,
            Method::DELETE => Ok(objects::delete_object(&id, store, logger).await),
            _ => Err(unsupported(&ctx.method, OBJECT_METHODS)),
        },
    }
}

fn unsupported(method: &Method, allowed: &'static str) -> ApiError {
    ApiError::UnsupportedMethod {
        method: method.clone(),
        allowed,
    }
}
