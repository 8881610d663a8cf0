//! Sync policy value object - when a push may proceed

use std::time::Duration;

/// Default interval between periodic pushes
pub const DEFAULT_SYNC_PERIOD: Duration = Duration::from_secs(300);

/// Governs when the synchronizer accepts a push
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPolicy {
    /// Push only after training has ended
    #[default]
    EndOnly,
    /// Push whenever the interval has elapsed since the last push
    Periodic(Duration),
}

impl SyncPolicy {
    pub fn is_end_only(&self) -> bool {
        matches!(self, SyncPolicy::EndOnly)
    }
}
