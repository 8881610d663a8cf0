//! Directory synchronization between driver and worker
//!
//! This module handles:
//! - Translating directories into each side's path convention
//! - Gating pushes on the sync policy and the end-of-training flag
//! - Rejecting overlapping transfers without queueing them

mod status;
mod synchronizer;

pub use status::{Side, SyncStatus};
pub use synchronizer::DirectorySynchronizer;
