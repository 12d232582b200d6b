use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use crate::status::{FetchError, StatusSnapshot, StatusSource};

/// Refresh period of the dashboard
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// What a mounted view should currently show
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    /// No attempt has resolved yet
    Loading,
    /// The latest attempt succeeded
    Ready(Arc<StatusSnapshot>),
    /// The latest attempt failed; replaces any earlier data
    Failed(String),
}

impl PollState {
    pub fn is_loading(&self) -> bool {
        matches!(self, PollState::Loading)
    }

    /// Snapshot to render, if the latest attempt succeeded
    pub fn snapshot(&self) -> Option<&Arc<StatusSnapshot>> {
        match self {
            PollState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Error to render, if the latest attempt failed
    pub fn error(&self) -> Option<&str> {
        match self {
            PollState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Receiver for poll state updates
pub type PollStateReceiver = watch::Receiver<PollState>;

/// Poller for the status endpoint
pub struct StatusPoller {
    source: Arc<dyn StatusSource>,
    interval: Duration,
}

impl StatusPoller {
    /// Create a poller that fetches from `source` every `interval`
    pub fn new(source: Arc<dyn StatusSource>, interval: Duration) -> Self {
        Self {
            source,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Start polling in a background task.
    ///
    /// The first fetch fires immediately; later fetches fire every interval
    /// measured from start. The returned handle stops the poller when
    /// stopped or dropped.
    pub fn start(self) -> (PollHandle, PollStateReceiver) {
        let (tx, rx) = watch::channel(PollState::Loading);
        let task = tokio::spawn(self.run(tx));
        (
            PollHandle {
                task,
                stopped: AtomicBool::new(false),
            },
            rx,
        )
    }

    /// Run the polling loop
    ///
    /// Each tick spawns its own fetch, so a slow fetch does not delay the
    /// next tick and two fetches may be in flight at once. Results are
    /// published in completion order.
    async fn run(self, tx: watch::Sender<PollState>) {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Dropping the set (on abort) cancels every in-flight fetch
        let mut in_flight: JoinSet<Result<StatusSnapshot, FetchError>> = JoinSet::new();
        let mut tick_count: u64 = 0;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tick_count = tick_count.wrapping_add(1);
                    debug!(
                        "Status poll: tick {} ({} already in flight)",
                        tick_count,
                        in_flight.len()
                    );
                    let source = self.source.clone();
                    in_flight.spawn(async move { source.fetch().await });
                }
                Some(joined) = in_flight.join_next() => {
                    let next = match joined {
                        Ok(Ok(snapshot)) => {
                            debug!("Status poll: snapshot {}", snapshot.timestamp);
                            PollState::Ready(Arc::new(snapshot))
                        }
                        Ok(Err(e)) => {
                            warn!("Status poll failed: {}", e);
                            PollState::Failed(e.to_string())
                        }
                        Err(e) => {
                            warn!("Status poll task failed: {}", e);
                            PollState::Failed(format!("status fetch aborted: {}", e))
                        }
                    };
                    tx.send_replace(next);
                }
                _ = tx.closed() => {
                    debug!("Status poll: all views gone, stopping");
                    break;
                }
            }
        }
    }
}

/// Handle to a running poller.
///
/// [`stop`](PollHandle::stop) is idempotent and always safe to call; dropping
/// the handle stops the poller as well. After stopping, no fetch is started
/// and no state is published.
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
    stopped: AtomicBool,
}

impl PollHandle {
    /// Cancel the schedule and any in-flight fetch
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            debug!("Status poll: stopped");
        }
        self.task.abort();
    }

    /// Whether the poller no longer runs
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst) || self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
