use crate::conf::ConnectionConfig;
use crate::registry::{Registry, SocketHandle};
use crate::server::admission::AdmissionControl;
use crate::server::connection::ConnectionHandler;
use crate::sink::Sink;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Pause after a failed accept so a persistent error (e.g. EMFILE) does not spin.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Owns the listening socket until shutdown.
pub struct Acceptor {
    pub(crate) listener: TcpListener,
    pub(crate) registry: Arc<Registry>,
    pub(crate) sink: Arc<dyn Sink>,
    pub(crate) admission: Arc<AdmissionControl>,
    pub(crate) connection: ConnectionConfig,
    pub(crate) shutdown: CancellationToken,
    pub(crate) tracker: TaskTracker,
}

impl Acceptor {
    /// Accept connections until shutdown. The listener is closed on return.
    pub async fn run(self) {
        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => break,

                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => self.admit(stream, peer),
                    Err(_) if self.shutdown.is_cancelled() => break,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                },
            }
        }

        info!("acceptor stopped, listener closed");
    }

    fn admit(&self, stream: TcpStream, peer: SocketAddr) {
        let Some(slot) = self.admission.try_acquire() else {
            warn!(
                peer = %peer,
                active = self.admission.active(),
                max_connections = self.admission.max(),
                "connection limit reached, rejecting client"
            );
            return;
        };

        // Registered before the first read so the janitor can see it.
        let handle = SocketHandle::child_of(&self.shutdown);
        self.registry.insert(peer, handle.clone());
        self.sink.emit_connect(peer);
        debug!(peer = %peer, active = self.registry.len(), "connection registered");

        let handler = ConnectionHandler::new(
            peer,
            stream,
            handle,
            self.registry.clone(),
            self.sink.clone(),
            self.shutdown.clone(),
            &self.connection,
        )
        .with_slot(slot);

        self.tracker.spawn(handler.run());
    }
}
