// Server loop module
// Accepts connections until a shutdown signal arrives

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::handle_connection;
use super::listener::create_reusable_listener;
use crate::config::AppState;
use crate::logger;

/// A bound server: listener plus the state every connection shares
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Bind the listening socket
    pub fn bind(addr: SocketAddr, state: Arc<AppState>) -> std::io::Result<Self> {
        let listener = create_reusable_listener(addr)?;
        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept and serve connections until `shutdown` is notified
    ///
    /// Must run inside a `LocalSet`; connections are spawned with `spawn_local`.
    /// In-flight connections are not drained on shutdown.
    pub async fn serve(self, shutdown: Arc<Notify>) {
        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            handle_connection(stream, peer_addr, &self.state);
                        }
                        Err(e) => {
                            logger::log_error(&format!("Failed to accept connection: {e}"));
                        }
                    }
                }

                () = shutdown.notified() => {
                    logger::log_signal("Shutdown requested, no longer accepting connections");
                    break;
                }
            }
        }
    }
}
