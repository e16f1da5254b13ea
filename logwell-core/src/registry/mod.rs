mod handle;
mod record;
#[cfg(test)]
mod tests;

pub use handle::SocketHandle;
pub use record::ConnectionRecord;

use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::time::Instant;

/// Table of active connections keyed by peer address.
///
/// Shared by the acceptor, every connection handler and the janitor.
///
/// Invariants:
/// - at most one record per peer address
/// - the lock is held only for the table operation itself; callers close
///   handles and emit events after the guard is released
#[derive(Debug, Default)]
pub struct Registry {
    connections: Mutex<HashMap<SocketAddr, ConnectionRecord>>,
}

impl Registry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Register a connection with `connected_at = last_activity = now`.
    ///
    /// An existing record for the same peer is replaced.
    pub fn insert(&self, peer: SocketAddr, handle: SocketHandle) {
        let record = ConnectionRecord::new(peer, handle, Instant::now());
        let replaced = self.connections.lock().insert(peer, record);

        if replaced.is_some() {
            tracing::warn!(peer = %peer, "connection registered twice, previous record replaced");
        }
    }

    /// Record one receive: refresh the activity timestamp and bump the
    /// receive count. No-op if the record is gone.
    pub fn touch(&self, peer: &SocketAddr) {
        if let Some(record) = self.connections.lock().get_mut(peer) {
            record.last_activity = Instant::now();
            record.receives += 1;
        }
    }

    /// Remove a record. Returns whether this call removed it.
    pub fn remove(&self, peer: &SocketAddr) -> bool {
        self.connections.lock().remove(peer).is_some()
    }

    /// Remove a record only if it is still idle at `now`.
    ///
    /// A snapshot taken before a `touch` can be stale by the time the
    /// janitor acts on it, so the check is repeated under the lock.
    pub fn remove_if_idle(
        &self,
        peer: &SocketAddr,
        idle_timeout: Duration,
        now: Instant,
    ) -> Option<ConnectionRecord> {
        let mut connections = self.connections.lock();
        let idle = connections
            .get(peer)
            .is_some_and(|record| record.is_idle(now, idle_timeout));

        if idle { connections.remove(peer) } else { None }
    }

    /// Point-in-time copy of every record.
    pub fn snapshot(&self) -> Vec<ConnectionRecord> {
        self.connections.lock().values().cloned().collect()
    }

    /// Remove and return every record.
    pub fn drain(&self) -> Vec<ConnectionRecord> {
        self.connections.lock().drain().map(|(_, record)| record).collect()
    }

    pub fn get(&self, peer: &SocketAddr) -> Option<ConnectionRecord> {
        self.connections.lock().get(peer).cloned()
    }

    pub fn contains(&self, peer: &SocketAddr) -> bool {
        self.connections.lock().contains_key(peer)
    }

    /// Current number of registered connections.
    pub fn len(&self) -> usize {
        self.connections.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.lock().is_empty()
    }
}
