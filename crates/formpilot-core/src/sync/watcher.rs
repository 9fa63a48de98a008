use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::session_sync::SessionSync;
use crate::session::keys;
use crate::storage::StorageChange;

/// Shortest poll interval; smaller values are raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Background reconciliation loop for one context.
///
/// Reconciles on every poll tick and, when the store has a change feed, as
/// soon as a session key changes. Stops when its token is cancelled or the
/// watcher is dropped.
pub struct SyncWatcher {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl SyncWatcher {
    /// Start watching. The first tick fires immediately, so subscribers see
    /// the initial state.
    pub fn spawn(sync: Arc<SessionSync>, interval: Duration, cancel: CancellationToken) -> Self {
        if interval < MIN_POLL_INTERVAL {
            warn!(
                requested_ms = interval.as_millis() as u64,
                min_ms = MIN_POLL_INTERVAL.as_millis() as u64,
                "Poll interval too short, clamping"
            );
        }
        let interval = interval.max(MIN_POLL_INTERVAL);
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            run(sync, interval, token).await;
        });
        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Token controlling this watcher.
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancel and wait for the loop to exit.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for SyncWatcher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(sync: Arc<SessionSync>, interval: Duration, cancel: CancellationToken) {
    let mut changes = sync.store().subscribe();
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        context = %sync.context(),
        interval_ms = interval.as_millis() as u64,
        change_feed = changes.is_some(),
        "Session watcher started"
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                sync.reconcile().await;
            }
            change = next_change(&mut changes) => match change {
                Ok(change) if keys::is_session_key(&change.key) => {
                    debug!(context = %sync.context(), key = %change.key, "Storage change event");
                    sync.reconcile().await;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    debug!(context = %sync.context(), skipped, "Storage change feed lagged");
                    sync.reconcile().await;
                }
                Err(RecvError::Closed) => {
                    // Fall back to polling only
                    changes = None;
                }
            },
        }
    }

    info!(context = %sync.context(), "Session watcher stopped");
}

/// Next change from the feed; pends forever when there is none.
async fn next_change(
    changes: &mut Option<broadcast::Receiver<StorageChange>>,
) -> Result<StorageChange, RecvError> {
    match changes {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
