//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all process, network and filesystem I/O.
//!
//! ## Structure
//!
//! - `sync/` - Transports (rsync over ssh, local mirror)
//! - `runtime/` - Compute runtime head attachment
//! - `lifecycle` - Training lifecycle adapters
//! - `results_dir` - Local results directory housekeeping

pub mod lifecycle;
pub mod results_dir;
pub mod runtime;
pub mod sync;

// Re-export for convenience
pub use lifecycle::{CommandLifecycle, TrainingHooks};
pub use results_dir::{delete_dir_contents, reset_dir};
pub use runtime::RayHeadRuntime;
pub use sync::{detect_transport, LocalTransport, RsyncTransport};
