//! Domain Layer
//!
//! Path conventions and checkpoint discovery, without process or network I/O.
//!
//! ## Structure
//!
//! - `value_objects/` - Immutable value types (Platform, Endpoint, SyncPolicy)
//! - `services/` - Pure services (PathTranslator, CheckpointRootLocator)
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No subprocesses** - Only the checkpoint locator reads the local filesystem
//! 2. **One platform table** - Platform dispatch lives in `Platform::rule`
//! 3. **Ports & Adapters** - Transfers, runtime and lifecycle go through traits

pub mod ports;
pub mod services;
pub mod value_objects;
