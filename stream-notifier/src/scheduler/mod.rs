//! Poll scheduler: recurring fetch, diff against the last snapshot, notify.
//!
//! At most one cycle runs at a time. A cycle that has started always runs to
//! completion; cancellation is only observed between cycles.


use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use crate::diff::{FirstPollPolicy, diff};
use crate::fetcher::{FetchError, LiveSource};
use crate::notification::{Notifier, StreamNotification};
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SchedulerState {
    Idle = 0,
    Fetching = 1,
    Terminating = 2,
}

impl SchedulerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => SchedulerState::Idle,
            1 => SchedulerState::Fetching,
            _ => SchedulerState::Terminating,
        }
    }
}

/// Result of one call to [`PollScheduler::poll_once`].
#[derive(Debug)]
pub enum PollOutcome {
    /// Another cycle was in flight (or the scheduler is stopping); nothing ran.
    Skipped,
    Completed { live: usize, announced: usize },
    Failed(FetchError),
}

pub struct PollScheduler {
    source: Arc<dyn LiveSource>,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
    first_poll: FirstPollPolicy,
    state: AtomicU8,
    previous: Mutex<Option<Snapshot>>,
}

/// Returns the scheduler to `Idle` when a cycle ends, even if it is dropped mid-way.
struct CycleGuard<'a>(&'a AtomicU8);

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        let _ = self.0.compare_exchange(
            SchedulerState::Fetching as u8,
            SchedulerState::Idle as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

impl PollScheduler {
    pub fn new(
        source: Arc<dyn LiveSource>,
        notifier: Arc<dyn Notifier>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            notifier,
            interval,
            first_poll: FirstPollPolicy::default(),
            state: AtomicU8::new(SchedulerState::Idle as u8),
            previous: Mutex::new(None),
        }
    }

    pub fn with_first_poll_policy(mut self, policy: FirstPollPolicy) -> Self {
        self.first_poll = policy;
        self
    }

    pub fn state(&self) -> SchedulerState {
        SchedulerState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// The last successfully fetched snapshot, if any.
    pub async fn previous_snapshot(&self) -> Option<Snapshot> {
        self.previous.lock().await.clone()
    }

    /// Run one fetch-diff-notify cycle unless one is already running.
    pub async fn poll_once(&self) -> PollOutcome {
        if self
            .state
            .compare_exchange(
                SchedulerState::Idle as u8,
                SchedulerState::Fetching as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            tracing::debug!(state = ?self.state(), "Poll tick dropped");
            return PollOutcome::Skipped;
        }
        let _guard = CycleGuard(&self.state);

        let current = match self.source.fetch().await {
            Ok(snapshot) => snapshot,
            // Stored snapshot stays as the baseline for the next success.
            Err(e) => return PollOutcome::Failed(e),
        };

        let mut previous = self.previous.lock().await;
        let fresh = diff(previous.as_ref(), Some(&current), self.first_poll);
        for record in &fresh {
            let notification = match StreamNotification::stream_online(record) {
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!(login = %record.login, "Failed to render notification: {e}");
                    continue;
                }
            };
            if let Err(e) = self.notifier.show(&notification).await {
                tracing::warn!(login = %record.login, "Failed to show notification: {e}");
            }
        }

        let live = current.len();
        *previous = Some(current);
        PollOutcome::Completed {
            live,
            announced: fresh.len(),
        }
    }

    /// Poll immediately, then one interval after each cycle ends, until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(interval_secs = self.interval.as_secs(), "Poll loop started");

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            match self.poll_once().await {
                PollOutcome::Completed { live, announced } => {
                    tracing::info!(live, announced, "Poll cycle completed");
                }
                PollOutcome::Failed(e) => {
                    tracing::warn!("Poll cycle skipped: {e}");
                }
                PollOutcome::Skipped => {}
            }
            // Ticks that came due mid-cycle are dropped; the next one is a full period away.
            ticker.reset();

            if cancel.is_cancelled() {
                break;
            }
        }

        self.state
            .store(SchedulerState::Terminating as u8, Ordering::Release);
        tracing::info!("Poll loop stopped (shutdown)");
    }
}
