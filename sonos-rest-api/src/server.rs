//! REST server lifecycle

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::directory::SpeakerDirectory;
use crate::error::{RestError, Result};
use crate::routes::routes;

/// HTTP server exposing `sonos-actions` commands
///
/// # Example
///
/// ```no_run
/// # use std::sync::Arc;
/// # use sonos_rest_api::{RestServer, SpeakerDirectory};
/// # async fn run<D: SpeakerDirectory + 'static>(directory: Arc<D>) -> sonos_rest_api::Result<()> {
/// let server = RestServer::start(directory, 8000).await?;
/// println!("Listening on {}", server.addr());
/// server.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct RestServer {
    addr: SocketAddr,
    shutdown_tx: Option<mpsc::Sender<()>>,
    server_handle: Option<JoinHandle<()>>,
}

impl RestServer {
    /// Binds to `port` on all interfaces and starts serving
    ///
    /// Returns once the listener is bound. Port 0 picks a free port; see
    /// [`RestServer::addr`].
    pub async fn start<D>(directory: Arc<D>, port: u16) -> Result<Self>
    where
        D: SpeakerDirectory + 'static,
    {
        Self::start_with_options(directory, port, false).await
    }

    /// Like [`RestServer::start`], resolving speakers from the saved list
    /// when `use_local_cache` is set
    pub async fn start_with_options<D>(directory: Arc<D>, port: u16, use_local_cache: bool) -> Result<Self>
    where
        D: SpeakerDirectory + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let (ready_tx, mut ready_rx) = mpsc::channel(1);
        let bind_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
        let routes = routes(directory, use_local_cache);

        let server_handle = tokio::spawn(async move {
            let bound = warp::serve(routes).try_bind_with_graceful_shutdown(bind_addr, async move {
                shutdown_rx.recv().await;
            });
            match bound {
                Ok((addr, server)) => {
                    info!(%addr, "REST server listening");
                    let _ = ready_tx.send(Ok(addr)).await;
                    server.await;
                    info!(%addr, "REST server stopped");
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e)).await;
                }
            }
        });

        let addr = ready_rx.recv().await.ok_or(RestError::NotReady)??;

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            server_handle: Some(server_handle),
        })
    }

    /// Address the server is bound to
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Stops accepting connections and waits for in-flight requests
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(handle) = self.server_handle.take() {
            handle.await?;
        }
        Ok(())
    }
}
