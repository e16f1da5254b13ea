use crate::conf::ConnectionConfig;
use crate::decode::{Decoded, LineFramer};
use crate::registry::{Registry, SocketHandle};
use crate::server::admission::AdmissionGuard;
use crate::sink::{DisconnectReason, Sink};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What a single receive produced.
#[derive(Debug)]
pub enum ReadOutcome {
    Data(usize),
    /// Zero-length read: the peer closed its side.
    PeerClosed,
    Failed(io::Error),
    /// The handle was closed by the janitor or shutdown.
    Closed,
}

/// Owns one accepted connection from registration to close.
///
/// Exactly one disconnect event is emitted per connection: by the handler
/// if it removes its own record, otherwise by whoever removed it first.
pub struct ConnectionHandler<S> {
    peer: SocketAddr,
    stream: S,
    handle: SocketHandle,
    registry: Arc<Registry>,
    sink: Arc<dyn Sink>,
    shutdown: CancellationToken,
    framer: LineFramer,
    read_buffer_size: usize,
    slot: Option<AdmissionGuard>,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + Unpin,
{
    pub fn new(
        peer: SocketAddr,
        stream: S,
        handle: SocketHandle,
        registry: Arc<Registry>,
        sink: Arc<dyn Sink>,
        shutdown: CancellationToken,
        cfg: &ConnectionConfig,
    ) -> Self {
        Self {
            peer,
            stream,
            handle,
            registry,
            sink,
            shutdown,
            framer: LineFramer::new(cfg.framing, cfg.max_line_bytes),
            read_buffer_size: cfg.read_buffer_size,
            slot: None,
        }
    }

    /// Hold an admission slot until the connection is finished.
    pub fn with_slot(mut self, slot: AdmissionGuard) -> Self {
        self.slot = Some(slot);
        self
    }

    /// Read until the connection ends, then clean up.
    ///
    /// Returns why the read loop stopped.
    pub async fn run(mut self) -> DisconnectReason {
        debug!(peer = %self.peer, "handling client");

        let mut buf = vec![0u8; self.read_buffer_size];
        let reason = loop {
            match self.read(&mut buf).await {
                ReadOutcome::Data(n) => {
                    let decoded = self.framer.push(&buf[..n]);
                    self.deliver(decoded);
                    self.registry.touch(&self.peer);
                }
                ReadOutcome::PeerClosed => break DisconnectReason::PeerClosed,
                ReadOutcome::Failed(e) => {
                    warn!(peer = %self.peer, error = %e, "receive failed, closing connection");
                    break DisconnectReason::ReadError;
                }
                ReadOutcome::Closed if self.shutdown.is_cancelled() => {
                    break DisconnectReason::Shutdown;
                }
                ReadOutcome::Closed => break DisconnectReason::Closed,
            }
        };

        self.finish(reason);
        reason
    }

    async fn read(&mut self, buf: &mut [u8]) -> ReadOutcome {
        tokio::select! {
            biased;

            _ = self.handle.closed() => ReadOutcome::Closed,

            result = self.stream.read(buf) => match result {
                Ok(0) => ReadOutcome::PeerClosed,
                Ok(n) => ReadOutcome::Data(n),
                Err(e) => ReadOutcome::Failed(e),
            },
        }
    }

    fn deliver(&self, decoded: Vec<Decoded>) {
        if decoded.is_empty() {
            return;
        }

        info!(peer = %self.peer, count = decoded.len(), "log batch received");

        for item in &decoded {
            match item {
                Decoded::Entry(entry) => self.sink.emit(self.peer, entry),
                Decoded::Heartbeat => self.sink.emit_heartbeat(self.peer),
            }
        }
    }

    fn finish(&mut self, reason: DisconnectReason) {
        // A record closed from outside may already have its disconnect
        // reported, so its unterminated tail is dropped rather than emitted late.
        match reason {
            DisconnectReason::PeerClosed | DisconnectReason::ReadError => {
                let rest = self.framer.finish();
                self.deliver(rest);
            }
            _ if self.framer.pending_len() > 0 => {
                debug!(
                    peer = %self.peer,
                    bytes = self.framer.pending_len(),
                    "discarding unterminated line"
                );
            }
            _ => {}
        }

        // The slot frees before the record goes, so an empty registry means
        // every slot is available again.
        drop(self.slot.take());

        if self.registry.remove(&self.peer) {
            self.handle.close();
            self.sink.emit_disconnect(self.peer, reason);
        } else {
            self.handle.close();
            debug!(peer = %self.peer, reason = %reason, "connection already removed");
        }
    }
}
