//! Configuration module for Ray QuickStart
//!
//! The job is described by one YAML document naming the driver, the
//! worker and the runtime head. Environment variables (RAY_QUICKSTART_*)
//! override the head address after loading.

mod loader;
mod types;

pub use loader::{ConfigWarning, HEAD_HOST_VAR, HEAD_PORT_VAR};
pub use types::{DriverConfig, PolicyKind, RayConfig, RayHeadConfig, SyncConfig, WorkerConfig};
