use crate::conf::RuntimeConfig;
use crate::registry::Registry;
use crate::server::acceptor::Acceptor;
use crate::server::admission::AdmissionControl;
use crate::server::error::ServerError;
use crate::server::janitor::Janitor;
use crate::server::signal::ShutdownSignal;
use crate::sink::{DisconnectReason, Sink, TracingSink};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Run the log server with the given configuration until a shutdown signal.
pub fn run(config: RuntimeConfig) -> Result<(), ServerError> {
    use tokio::runtime::Builder;

    let rt = Builder::new_multi_thread()
        .thread_name("logwell-worker")
        .enable_all()
        .build()
        .map_err(ServerError::Runtime)?;

    rt.block_on(async move {
        let signals = ShutdownSignal::install().map_err(ServerError::Signal)?;
        let server = Server::bind(config, Arc::new(TracingSink::new())).await?;

        let shutdown = server.shutdown_token();
        tokio::spawn(async move {
            match signals.recv().await {
                Ok(signal) => tracing::info!(signal, "shutdown requested"),
                Err(e) => tracing::error!(error = %e, "signal listener failed, shutting down"),
            }
            shutdown.cancel();
        });

        server.serve().await;
        Ok(())
    })
}

/// A bound, not yet serving, log server.
///
/// Binding is separate from serving so bind failures surface before any
/// task is spawned, and so callers can learn the actual port.
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    config: RuntimeConfig,
    registry: Arc<Registry>,
    sink: Arc<dyn Sink>,
    shutdown: CancellationToken,
}

impl Server {
    pub async fn bind(config: RuntimeConfig, sink: Arc<dyn Sink>) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(&config.server.listen)
            .await
            .map_err(|source| ServerError::Bind {
                addr: config.server.listen.clone(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

        Ok(Self {
            listener,
            local_addr,
            config,
            registry: Arc::new(Registry::new()),
            sink,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Cancelling this token stops the server.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Serve until the shutdown token is cancelled, then tear everything down.
    pub async fn serve(self) {
        let Server {
            listener,
            local_addr,
            config,
            registry,
            sink,
            shutdown,
        } = self;

        tracing::info!(
            listen = %local_addr,
            idle_timeout_secs = config.connection.idle_timeout.as_secs(),
            max_connections = config.server.max_connections,
            "server started, waiting for connections"
        );

        let tracker = TaskTracker::new();

        let janitor = Janitor::new(
            registry.clone(),
            sink.clone(),
            config.janitor.interval,
            config.connection.idle_timeout,
        );
        let janitor_task = tokio::spawn(janitor.run(shutdown.clone()));

        let acceptor = Acceptor {
            listener,
            registry: registry.clone(),
            sink: sink.clone(),
            admission: Arc::new(AdmissionControl::new(config.server.max_connections)),
            connection: config.connection.clone(),
            shutdown: shutdown.clone(),
            tracker: tracker.clone(),
        };
        acceptor.run().await;

        // The acceptor only returns once shutdown was requested.
        shutdown.cancel();
        if let Err(e) = janitor_task.await {
            tracing::error!(error = %e, "janitor task failed");
        }

        let closed = close_all(&registry, sink.as_ref());

        tracker.close();
        if tokio::time::timeout(config.server.shutdown_grace, tracker.wait())
            .await
            .is_err()
        {
            tracing::warn!(
                remaining = tracker.len(),
                "connection tasks still running after shutdown grace period"
            );
        }

        tracing::info!(closed, "cleanup complete");
    }
}

/// Drain the registry, closing every handle outside the lock.
fn close_all(registry: &Registry, sink: &dyn Sink) -> usize {
    let drained = registry.drain();
    for record in &drained {
        record.handle.close();
        sink.emit_disconnect(record.peer, DisconnectReason::Shutdown);
    }
    drained.len()
}
