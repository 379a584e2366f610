// Connection module
// Serves a single accepted TCP connection

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve one connection in a task on the current `LocalSet`.
///
/// Requests on the connection are handled one at a time, each to completion.
/// No timeouts are applied; a slow client only stalls its own connection.
///
/// # Arguments
///
/// * `stream` - The accepted TCP stream
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
pub fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, state: &Arc<AppState>) {
    if state.access_log() {
        logger::log_connection_accepted(&peer_addr);
    }

    let state = Arc::clone(state);
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let conn = http1::Builder::new().keep_alive(true).serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer_addr)),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}
