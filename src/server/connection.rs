// Connection handling module
// Serves one accepted TCP connection with the object handler

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve HTTP/1.1 requests on `stream` until the peer closes it.
///
/// Each request is fully buffered, dispatched and answered before the
/// next one on the same connection is read.
pub async fn serve_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    let io = TokioIo::new(stream);
    let logger = state.logger.clone();
    logger.debug(&format!("[Connection] Accepted from: {peer_addr}"));

    let service = service_fn(move |req| handler::handle_request(req, Arc::clone(&state)));

    let mut builder = http1::Builder::new();
    builder.keep_alive(true);

    if let Err(err) = builder.serve_connection(io, service).await {
        logger::log_connection_error(&logger, &err);
    }
}
