//! Sync Orchestrator
//!
//! Sequences a training job's results handling around the synchronizer:
//! cleaning, worker provisioning, runtime attach, and the final push.

mod options;
mod state;
mod use_case;


pub use options::{LocalStartup, OrchestratorOptions, RUNTIME_CONFIG_FILES};
pub use state::OrchestratorState;
pub use use_case::SyncOrchestrator;
