//! Background refresher for the task dashboard.
//!
//! Polls the persisted assignment list on a fixed interval and publishes it
//! on a [`tokio::sync::watch`] channel only when its fingerprint changed.
//! Dropping the [`RefreshHandle`] aborts the task.

use espora_core::{Fingerprint, TaskAssignment};
use espora_storage::{LocalStore, StorageKey};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(3);

const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(10);

/// One published view of the assignment list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentFeed {
    pub assignments: Vec<TaskAssignment>,
    /// `None` while the key is absent.
    pub fingerprint: Option<Fingerprint>,
    /// Bumped on every publish; the initial read is revision 0.
    pub revision: u64,
}

fn read_feed(store: &LocalStore, revision: u64) -> AssignmentFeed {
    let snapshot = store.load_snapshot::<Vec<TaskAssignment>>(StorageKey::TaskAssignments);
    AssignmentFeed {
        fingerprint: snapshot.fingerprint(),
        assignments: snapshot.into_value(),
        revision,
    }
}

/// Start polling `store` every `interval`. Must be called inside a Tokio
/// runtime.
pub fn spawn_refresher(store: LocalStore, interval: Duration) -> RefreshHandle {
    let (tx, rx) = watch::channel(read_feed(&store, 0));
    let period = interval.max(MIN_REFRESH_INTERVAL);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately; the initial read already happened.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if tx.is_closed() {
                break;
            }
            let (known, revision) = {
                let current = tx.borrow();
                (current.fingerprint, current.revision)
            };
            let feed = read_feed(&store, revision + 1);
            if feed.fingerprint == known {
                continue;
            }
            tracing::debug!(
                revision = feed.revision,
                assignments = feed.assignments.len(),
                "Assignment list changed, publishing"
            );
            tx.send_replace(feed);
        }
        tracing::debug!("Assignment refresher stopped");
    });

    RefreshHandle { rx, task }
}

/// Owner of a running refresher.
#[derive(Debug)]
pub struct RefreshHandle {
    rx: watch::Receiver<AssignmentFeed>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// A new receiver of published feeds.
    pub fn subscribe(&self) -> watch::Receiver<AssignmentFeed> {
        self.rx.clone()
    }

    /// The most recently published feed.
    pub fn latest(&self) -> AssignmentFeed {
        self.rx.borrow().clone()
    }

    /// Wait for the next publish. `None` once the refresher has stopped.
    pub async fn changed(&mut self) -> Option<AssignmentFeed> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
