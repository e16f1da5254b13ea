use crate::decode::LogEntry;
use crate::sink::{DisconnectReason, Sink};
use std::net::SocketAddr;
use tracing::{debug, info};

/// Writes received records through `tracing` under the `logwell::ingest`
/// target, so they land in whatever outputs logging was initialised with.
///
/// Heartbeats go to `debug` and stay invisible at the default level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for TracingSink {
    fn emit(&self, peer: SocketAddr, entry: &LogEntry) {
        match entry {
            LogEntry::Structured(fields) => {
                let payload = serde_json::to_string(fields).unwrap_or_default();
                info!(
                    target: "logwell::ingest",
                    peer = %peer,
                    tag = entry.tag().unwrap_or_default(),
                    entry = %payload,
                    "log entry"
                );
            }
            LogEntry::Text(text) => {
                info!(target: "logwell::ingest", peer = %peer, text = %text, "log entry");
            }
        }
    }

    fn emit_heartbeat(&self, peer: SocketAddr) {
        debug!(target: "logwell::ingest", peer = %peer, "heartbeat");
    }

    fn emit_connect(&self, peer: SocketAddr) {
        info!(target: "logwell::ingest", peer = %peer, "client connected");
    }

    fn emit_disconnect(&self, peer: SocketAddr, reason: DisconnectReason) {
        info!(
            target: "logwell::ingest",
            peer = %peer,
            reason = %reason,
            "client disconnected"
        );
    }
}
