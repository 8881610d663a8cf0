//! Compute Runtime Port
//!
//! Attaching to the distributed compute runtime's head node, and starting
//! a local head when the machine is able to.

use std::path::Path;

use crate::domain::value_objects::HeadAddress;
use crate::error::RuntimeError;

/// Distributed compute runtime the job runs on
pub trait ComputeRuntime: Send + Sync {
    /// Whether a previous `connect` already attached this process
    fn is_connected(&self) -> bool;

    /// Attach to the head at `address`
    fn connect(&self, address: &HeadAddress) -> Result<(), RuntimeError>;

    /// Run a local startup script and wait for it to exit
    fn start_local(&self, script: &Path) -> Result<(), RuntimeError>;
}
