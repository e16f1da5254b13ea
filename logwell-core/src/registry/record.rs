use crate::registry::handle::SocketHandle;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::time::Instant;

/// One live client connection, as seen by the registry.
#[derive(Debug, Clone)]
pub struct ConnectionRecord {
    pub peer: SocketAddr,
    pub handle: SocketHandle,
    pub connected_at: Instant,
    pub last_activity: Instant,
    /// Successful receives so far; bumped by every `touch`.
    pub receives: u64,
}

impl ConnectionRecord {
    pub(crate) fn new(peer: SocketAddr, handle: SocketHandle, now: Instant) -> Self {
        Self {
            peer,
            handle,
            connected_at: now,
            last_activity: now,
            receives: 0,
        }
    }

    /// Time since the last successful receive.
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }

    /// Strictly older than `idle_timeout` at `now`.
    pub fn is_idle(&self, now: Instant, idle_timeout: Duration) -> bool {
        self.idle_for(now) > idle_timeout
    }
}
