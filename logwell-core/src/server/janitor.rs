use crate::registry::Registry;
use crate::sink::{DisconnectReason, Sink};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Periodically evicts connections that have gone quiet.
pub struct Janitor {
    registry: Arc<Registry>,
    sink: Arc<dyn Sink>,
    interval: Duration,
    idle_timeout: Duration,
}

impl Janitor {
    pub fn new(
        registry: Arc<Registry>,
        sink: Arc<dyn Sink>,
        interval: Duration,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            sink,
            interval,
            idle_timeout,
        }
    }

    /// Sweep every `interval` until shutdown.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,

                _ = ticker.tick() => {
                    self.sweep(Instant::now());
                }
            }
        }

        debug!("janitor stopped");
    }

    /// Evict every record idle for longer than the timeout at `now`.
    ///
    /// Returns how many were evicted. Each evicted handle is closed once and
    /// reported to the sink once; handles are closed after the registry lock
    /// is released.
    pub fn sweep(&self, now: Instant) -> usize {
        let stale: Vec<_> = self
            .registry
            .snapshot()
            .into_iter()
            .filter(|record| record.is_idle(now, self.idle_timeout))
            .collect();

        let mut evicted = 0;
        for candidate in stale {
            let Some(record) = self
                .registry
                .remove_if_idle(&candidate.peer, self.idle_timeout, now)
            else {
                continue;
            };

            warn!(
                peer = %record.peer,
                idle_secs = record.idle_for(now).as_secs(),
                "client inactive, evicting"
            );
            record.handle.close();
            self.sink
                .emit_disconnect(record.peer, DisconnectReason::IdleTimeout);
            evicted += 1;
        }

        debug!(active = self.registry.len(), evicted, "janitor sweep complete");
        evicted
    }
}
