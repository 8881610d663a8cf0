//! Ray QuickStart - results synchronization for distributed training jobs
//!
//! A driver machine orchestrates a training job that runs on a worker
//! machine. This crate keeps the job's checkpoint and results directories
//! consistent between the two: it translates home-relative paths between
//! operating systems, finds checkpoint roots by their marker file, mirrors
//! directories with rsync over ssh, and sequences the pre- and
//! post-training steps around the training run.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

// Re-exports for convenience
pub use application::{
    DirectorySynchronizer, JobContext, OrchestratorOptions, OrchestratorState, Side,
    SyncOrchestrator, SyncStatus,
};
pub use config::RayConfig;
pub use domain::services::{CheckpointRootLocator, PathTranslator, CHECKPOINT_MARKER};
pub use domain::value_objects::{Endpoint, Platform, SyncPolicy};
pub use error::{RuntimeError, SyncError, SyncResult, TransportError};
