//! Synchronizer state

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which host executes the synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Driver,
    Worker,
}

/// Point-in-time view of a synchronizer's state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub in_progress: bool,
    pub training_ended: bool,
    pub last_push: Option<DateTime<Utc>>,
    pub last_pull: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default)]
struct TransferTimes {
    last_push: Option<DateTime<Utc>>,
    last_pull: Option<DateTime<Utc>>,
}

/// Mutable state owned by one synchronizer
#[derive(Debug, Default)]
pub(super) struct SyncState {
    in_progress: AtomicBool,
    training_ended: AtomicBool,
    times: Mutex<TransferTimes>,
}

impl SyncState {
    /// Claim the in-progress flag, or `None` if a transfer is running
    pub(super) fn try_begin(&self) -> Option<InProgressGuard<'_>> {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InProgressGuard {
                flag: &self.in_progress,
            })
    }

    pub(super) fn training_ended(&self) -> bool {
        self.training_ended.load(Ordering::SeqCst)
    }

    /// Set the end flag; returns true only for the first call
    pub(super) fn end_training(&self) -> bool {
        !self.training_ended.swap(true, Ordering::SeqCst)
    }

    pub(super) fn last_push(&self) -> Option<DateTime<Utc>> {
        self.times.lock().ok().and_then(|t| t.last_push)
    }

    pub(super) fn record_push(&self, at: DateTime<Utc>) {
        if let Ok(mut times) = self.times.lock() {
            times.last_push = Some(at);
        }
    }

    pub(super) fn record_pull(&self, at: DateTime<Utc>) {
        if let Ok(mut times) = self.times.lock() {
            times.last_pull = Some(at);
        }
    }

    pub(super) fn snapshot(&self) -> SyncStatus {
        let times = self.times.lock().map(|t| *t).unwrap_or_default();
        SyncStatus {
            in_progress: self.in_progress.load(Ordering::SeqCst),
            training_ended: self.training_ended(),
            last_push: times.last_push,
            last_pull: times.last_pull,
        }
    }
}

/// Releases the in-progress flag when dropped
pub(super) struct InProgressGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
