//! Training Lifecycle Implementations
//!
//! `TrainingHooks` is the registry any training adapter can embed.
//! `CommandLifecycle` runs a training command as a child process and
//! fires the hooks when it exits.

use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use tracing::{info, warn};

use crate::domain::ports::{CompletionCallback, TrainingLifecycle};

/// Completion callbacks, fired at most once
#[derive(Default)]
pub struct TrainingHooks {
    callbacks: Vec<CompletionCallback>,
    completed: bool,
}

impl TrainingHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting for completion
    pub fn pending(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Report that training returned; runs every registered callback once.
    ///
    /// Returns how many callbacks ran. Later calls run nothing.
    pub fn complete(&mut self) -> usize {
        if self.completed {
            return 0;
        }
        self.completed = true;
        let callbacks = std::mem::take(&mut self.callbacks);
        let count = callbacks.len();
        for callback in callbacks {
            callback();
        }
        count
    }
}

impl TrainingLifecycle for TrainingHooks {
    fn on_complete(&mut self, callback: CompletionCallback) {
        if self.completed {
            // Training already returned; there is nothing left to wait for.
            callback();
        } else {
            self.callbacks.push(callback);
        }
    }
}

/// Lifecycle backed by a training command run to completion
pub struct CommandLifecycle {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    hooks: TrainingHooks,
}

impl CommandLifecycle {
    /// `command[0]` is the program, the rest its arguments
    pub fn new(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            working_dir: None,
            hooks: TrainingHooks::new(),
        })
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Run the training command, then fire completion callbacks.
    ///
    /// Callbacks run whether training succeeded or not: weights written
    /// before a failure still need to come back to the driver.
    pub fn run(&mut self) -> std::io::Result<ExitStatus> {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        info!(program = %self.program, args = ?self.args, "starting training");
        let status = command.status();
        match &status {
            Ok(s) if s.success() => info!("training finished"),
            Ok(s) => warn!(code = ?s.code(), "training exited unsuccessfully"),
            Err(e) => warn!(error = %e, "training command could not run"),
        }

        self.hooks.complete();
        status
    }
}

impl TrainingLifecycle for CommandLifecycle {
    fn on_complete(&mut self, callback: CompletionCallback) {
        self.hooks.on_complete(callback);
    }
}
