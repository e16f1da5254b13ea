use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

/// Close capability for one accepted socket.
///
/// The connection handler owns the `TcpStream` for I/O. Everyone else
/// (janitor, shutdown) only gets this handle, which can ask the owner to
/// stop: closing wakes the handler's pending read, the handler returns and
/// the stream is dropped.
///
/// Invariants:
/// - `close()` reports `true` exactly once, for the call that closed it
/// - closing an already-closed handle is a no-op
#[derive(Debug, Clone)]
pub struct SocketHandle {
    token: CancellationToken,
    closed: Arc<AtomicBool>,
}

impl SocketHandle {
    /// Standalone handle, not tied to server shutdown.
    pub fn new() -> Self {
        Self::with_token(CancellationToken::new())
    }

    /// Handle that is also closed when `parent` is cancelled.
    pub fn child_of(parent: &CancellationToken) -> Self {
        Self::with_token(parent.child_token())
    }

    fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Force the socket closed. Returns whether this call did it.
    ///
    /// A handle already closed through its parent reports `false`.
    pub fn close(&self) -> bool {
        let cancelled = self.token.is_cancelled();
        let first = !self.closed.swap(true, Ordering::AcqRel) && !cancelled;
        self.token.cancel();
        first
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire) || self.token.is_cancelled()
    }

    /// Resolves once the handle is closed, either directly or through its parent.
    pub async fn closed(&self) {
        self.token.cancelled().await;
    }
}

impl Default for SocketHandle {
    fn default() -> Self {
        Self::new()
    }
}
