//! Domain Value Objects
//!
//! Immutable value types that describe the two hosts of a job and how
//! they are kept in sync.

mod endpoint;
mod head_address;
mod platform;
mod sync_policy;

pub use endpoint::Endpoint;
pub use head_address::HeadAddress;
pub use platform::{Platform, PlatformPathRule};
pub use sync_policy::{SyncPolicy, DEFAULT_SYNC_PERIOD};
