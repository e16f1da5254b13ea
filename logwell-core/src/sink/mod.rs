mod memory;
mod tracing_sink;

pub use memory::{MemorySink, SinkEvent};
pub use tracing_sink::TracingSink;

use crate::decode::LogEntry;
use serde::Serialize;
use std::fmt;
use std::net::SocketAddr;

/// Why a connection left the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisconnectReason {
    /// The peer closed its side (zero-length read).
    PeerClosed,
    /// A read failed (reset, timeout, ...).
    ReadError,
    /// Evicted by the janitor.
    IdleTimeout,
    /// Server shutdown.
    Shutdown,
    /// Closed through its handle by something other than the janitor or shutdown.
    Closed,
}

impl DisconnectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisconnectReason::PeerClosed => "peer_closed",
            DisconnectReason::ReadError => "read_error",
            DisconnectReason::IdleTimeout => "idle_timeout",
            DisconnectReason::Shutdown => "shutdown",
            DisconnectReason::Closed => "closed",
        }
    }
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for everything a producer sends.
///
/// Called from many connection tasks at once. Within one connection,
/// calls arrive in receive order; across connections there is no ordering.
/// Exactly one `emit_disconnect` follows each `emit_connect`.
pub trait Sink: Send + Sync + 'static {
    fn emit(&self, peer: SocketAddr, entry: &LogEntry);

    fn emit_heartbeat(&self, peer: SocketAddr);

    fn emit_connect(&self, peer: SocketAddr);

    fn emit_disconnect(&self, peer: SocketAddr, reason: DisconnectReason);
}
