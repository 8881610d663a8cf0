//! Transport Implementations
//!
//! Concrete implementations of the RemoteTransport port:
//! - RsyncTransport: rsync + ssh to a real remote worker
//! - LocalTransport: same-host mirror when the worker is the loopback host

mod local;
mod rsync;
mod ssh;

pub use local::LocalTransport;
pub use rsync::RsyncTransport;
pub use ssh::{remove_dir_command, shell_quote};

use tracing::debug;

use crate::domain::ports::RemoteTransport;
use crate::domain::value_objects::Endpoint;

/// Pick the transport able to reach `worker`
///
/// Returns `None` when the worker is remote and rsync is not installed.
pub fn detect_transport(worker: &Endpoint) -> Option<Box<dyn RemoteTransport>> {
    if worker.is_loopback() {
        debug!(worker = %worker, "worker is local, using local transport");
        return Some(Box::new(LocalTransport));
    }

    if RsyncTransport::check_available() {
        return Some(Box::new(RsyncTransport));
    }

    None
}
