//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod lifecycle;
pub mod runtime;
pub mod transport;

pub use lifecycle::{CompletionCallback, TrainingLifecycle};
pub use runtime::ComputeRuntime;
pub use transport::{CopyRequest, Filter, Location, RemoteTransport};
