//! Error types for Ray QuickStart
//!
//! Configuration and path-resolution failures propagate as `SyncError`.
//! Transport failures (`TransportError`) stop at the synchronizer boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Ray QuickStart operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Main error type surfaced to callers of the orchestrator and locator
#[derive(Error, Debug)]
pub enum SyncError {
    /// Configuration file missing
    #[error("config file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file present but unusable
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Platform value outside {darwin, linux, windows}
    #[error("unknown platform '{value}' (expected one of: darwin, linux, windows)")]
    UnknownPlatform { value: String },

    /// Compute runtime head unreachable, after the local fallback if one applied
    #[error("could not connect to compute runtime at {address}: {message}")]
    Connection { address: String, message: String },

    /// Compute runtime failed for a reason other than connectivity
    #[error("compute runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    /// Upward walk reached the filesystem root without finding a marker
    #[error("checkpoint directory not found for {path}")]
    CheckpointRootNotFound { path: PathBuf },

    /// Starting path for a checkpoint lookup does not exist
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a remote-copy or remote-shell invocation
#[derive(Error, Debug)]
pub enum TransportError {
    /// The external program could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external program ran and exited non-zero
    #[error("{program} targeting {target} failed with exit code {code:?}: {stderr}")]
    CommandFailed {
        program: String,
        target: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The request cannot be expressed by this transport
    #[error("unsupported transfer: {0}")]
    Unsupported(String),

    /// Local filesystem error while mirroring
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure attaching to or starting the compute runtime
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Head address unreachable
    #[error("connection error: {0}")]
    Connection(String),

    /// Local head startup script failed
    #[error("local startup failed: {0}")]
    Startup(String),
}
