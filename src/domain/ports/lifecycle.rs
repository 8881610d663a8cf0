//! Training Lifecycle Port
//!
//! The single registration point through which the training framework
//! tells the sync subsystem that a job's `fit`/`train` call returned.

/// Callback run once when training completes
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// Capability implemented by whatever training-framework adapter is in use
pub trait TrainingLifecycle {
    /// Register `callback` to run when training completes, before the
    /// training result is handed back to its caller.
    fn on_complete(&mut self, callback: CompletionCallback);
}
