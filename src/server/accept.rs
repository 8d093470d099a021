// Accept loop module
// Accepts connections until told to stop, then aborts whatever is in flight

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinSet;

use super::connection::serve_connection;
use crate::config::AppState;
use crate::logger;

/// Accept connections on `listener` until `shutdown` resolves.
///
/// `ready` is fulfilled once the loop is running, before the first accept.
/// When `shutdown` resolves the listener is closed and every open
/// connection is aborted; there is no graceful drain.
pub async fn serve_until<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    ready: Option<oneshot::Sender<()>>,
    shutdown: F,
) where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut connections = JoinSet::new();

    if let Some(ready) = ready {
        // The starter may have given up waiting; serving continues regardless
        let _ = ready.send(());
    }

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connections.spawn(serve_connection(stream, peer_addr, Arc::clone(&state)));
                    }
                    Err(e) => logger::log_accept_error(&state.logger, &e),
                }
            }

            Some(joined) = connections.join_next(), if !connections.is_empty() => {
                if let Err(e) = joined {
                    if e.is_panic() {
                        state.logger.error(&format!("Connection task panicked: {e}"));
                    }
                }
            }

            () = &mut shutdown => break,
        }
    }

    drop(listener);
    connections.shutdown().await;
}
