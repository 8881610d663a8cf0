//! Application Layer
//!
//! Use cases that drive results synchronization for a training job.
//! This layer:
//! - Depends on the Domain layer (value objects, services, ports)
//! - Reaches Infrastructure only through port traits, plus local
//!   results-directory housekeeping
//!
//! ## Use Cases
//!
//! - `DirectorySynchronizer` - push/pull/delete between driver and worker
//! - `SyncOrchestrator` - clean, provision, attach, then push after training

mod context;
pub mod orchestrator;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::JobContext;
pub use orchestrator::{LocalStartup, OrchestratorOptions, OrchestratorState, SyncOrchestrator};
pub use sync::{DirectorySynchronizer, Side, SyncStatus};
