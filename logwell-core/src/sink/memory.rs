use crate::decode::LogEntry;
use crate::sink::{DisconnectReason, Sink};
use parking_lot::Mutex;
use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Connect(SocketAddr),
    Entry(SocketAddr, LogEntry),
    Heartbeat(SocketAddr),
    Disconnect(SocketAddr, DisconnectReason),
}

impl SinkEvent {
    pub fn peer(&self) -> SocketAddr {
        match self {
            SinkEvent::Connect(peer)
            | SinkEvent::Entry(peer, _)
            | SinkEvent::Heartbeat(peer)
            | SinkEvent::Disconnect(peer, _) => *peer,
        }
    }
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<SinkEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().clone()
    }

    /// Events for one peer, in the order they were emitted.
    pub fn events_for(&self, peer: SocketAddr) -> Vec<SinkEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.peer() == peer)
            .cloned()
            .collect()
    }

    pub fn disconnects(&self) -> Vec<(SocketAddr, DisconnectReason)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Disconnect(peer, reason) => Some((*peer, *reason)),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn push(&self, event: SinkEvent) {
        self.events.lock().push(event);
    }
}

impl Sink for MemorySink {
    fn emit(&self, peer: SocketAddr, entry: &LogEntry) {
        self.push(SinkEvent::Entry(peer, entry.clone()));
    }

    fn emit_heartbeat(&self, peer: SocketAddr) {
        self.push(SinkEvent::Heartbeat(peer));
    }

    fn emit_connect(&self, peer: SocketAddr) {
        self.push(SinkEvent::Connect(peer));
    }

    fn emit_disconnect(&self, peer: SocketAddr, reason: DisconnectReason) {
        self.push(SinkEvent::Disconnect(peer, reason));
    }
}
