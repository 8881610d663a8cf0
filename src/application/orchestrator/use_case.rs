//! Sync Orchestrator Use Case
//!
//! Prepares a job before training and wires the final push after it:
//!
//! 1. Clean the results directories on both sides.
//! 2. Copy runtime-configuration files to the worker and run its setup commands.
//! 3. Attach to the compute runtime, starting a local head once if allowed.
//! 4. Register the end-of-training push with the training lifecycle.
//!
//! The orchestrator never runs training itself.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{error, info, warn};

use crate::application::sync::{DirectorySynchronizer, Side};
use crate::application::JobContext;
use crate::domain::ports::{
    ComputeRuntime, CopyRequest, Filter, Location, RemoteTransport, TrainingLifecycle,
};
use crate::domain::services::{strip_file_scheme, PathTranslator};
use crate::domain::value_objects::{Endpoint, HeadAddress};
use crate::error::{RuntimeError, SyncError, SyncResult};
use crate::infrastructure::reset_dir;

use super::options::OrchestratorOptions;
use super::state::OrchestratorState;

/// Orchestrates one job's results lifecycle from the driver
pub struct SyncOrchestrator<R: ComputeRuntime> {
    runtime: R,
    options: OrchestratorOptions,
    state: Arc<Mutex<OrchestratorState>>,
    final_push: Arc<Mutex<Option<bool>>>,
}

impl<R: ComputeRuntime> SyncOrchestrator<R> {
    pub fn new(runtime: R, options: OrchestratorOptions) -> Self {
        Self {
            runtime,
            options,
            state: Arc::new(Mutex::new(OrchestratorState::default())),
            final_push: Arc::new(Mutex::new(None)),
        }
    }

    /// Prepare the job and register the final push.
    ///
    /// Returns the driver-side synchronizer. Fails when the configuration
    /// cannot produce a usable job: the local results directory cannot be
    /// reset, or the compute runtime stays unreachable.
    pub fn run<T>(
        &self,
        ctx: &JobContext,
        transport: T,
        lifecycle: &mut dyn TrainingLifecycle,
    ) -> SyncResult<Arc<DirectorySynchronizer<T>>>
    where
        T: RemoteTransport + 'static,
    {
        let _enter = ctx.span().enter();
        let synchronizer = Arc::new(DirectorySynchronizer::from_context(
            ctx,
            transport,
            Side::Driver,
        ));

        if self.runtime.is_connected() {
            info!("compute runtime already attached, skipping setup");
        } else {
            if self.options.clean_results_at_start {
                self.set_state(OrchestratorState::CleaningResults);
                self.clean_results(&synchronizer)?;
            }

            self.set_state(OrchestratorState::ConfiguringRemoteEnvironment);
            self.configure_remote_environment(ctx, &synchronizer);

            self.set_state(OrchestratorState::RuntimeInitializing);
            self.initialize_runtime(ctx, &ctx.config().head_address())?;
        }

        self.set_state(OrchestratorState::Ready);
        self.register_final_push(ctx, &synchronizer, lifecycle);
        Ok(synchronizer)
    }

    pub fn state(&self) -> OrchestratorState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Outcome of the end-of-training push, once it has run
    pub fn final_push_succeeded(&self) -> Option<bool> {
        *self.final_push.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    fn set_state(&self, next: OrchestratorState) {
        transition(&self.state, next);
    }

    /// Empty the local results directory, then mirror it onto the worker
    fn clean_results<T: RemoteTransport>(
        &self,
        synchronizer: &DirectorySynchronizer<T>,
    ) -> SyncResult<()> {
        let local = host_path(synchronizer.driver(), &self.options.results_dir);
        let removed = reset_dir(Path::new(&local))?;
        info!(results_dir = %local, removed, "cleaned local results");

        if !synchronizer.pull(
            &self.options.results_dir,
            self.options.worker_results_dir(),
            &[],
        ) {
            warn!(
                worker_results_dir = self.options.worker_results_dir(),
                "could not clean worker results, stale files may be pushed back"
            );
        }
        Ok(())
    }

    /// Copy runtime-configuration files and run setup commands on the worker.
    ///
    /// Failures are logged only: a worker set up by a previous run still works.
    fn configure_remote_environment<T: RemoteTransport>(
        &self,
        ctx: &JobContext,
        synchronizer: &DirectorySynchronizer<T>,
    ) {
        let worker = synchronizer.worker();
        let base_dir = self.options.base_dir.to_string_lossy();

        let mut filters: Vec<Filter> = self
            .options
            .runtime_config_files
            .iter()
            .map(|file| Filter::Include(file.clone()))
            .collect();
        filters.push(Filter::Exclude("*".to_string()));

        let request = CopyRequest::new(
            Location::Local(host_path(synchronizer.driver(), &base_dir)),
            Location::Remote {
                endpoint: worker.clone(),
                path: host_path(worker, &base_dir),
            },
        )
        .with_filters(filters);

        info!(to = %request.destination, "copying runtime configuration to worker");
        if let Err(e) = synchronizer.transport().copy(&request) {
            error!(
                destination = %request.destination,
                error = %e,
                "error copying runtime configuration"
            );
        }

        let setup_commands = &ctx.config().worker.setup_commands;
        if setup_commands.is_empty() {
            return;
        }
        let command = setup_commands.join(" && ");
        info!(worker = %worker, %command, "running worker setup commands");
        if let Err(e) = synchronizer.transport().exec(worker, &command) {
            error!(worker = %worker, error = %e, "error running worker setup commands");
        }
    }

    /// Attach to the head, retrying once after a local startup when allowed
    fn initialize_runtime(&self, ctx: &JobContext, address: &HeadAddress) -> SyncResult<()> {
        info!(%address, "connecting to compute runtime");
        let message = match self.runtime.connect(address) {
            Ok(()) => return Ok(()),
            Err(RuntimeError::Connection(message)) => message,
            Err(other) => return Err(other.into()),
        };

        let startup = self
            .options
            .local_startup
            .as_ref()
            .filter(|s| s.platform == ctx.driver_platform() && s.script.is_file());
        let Some(startup) = startup else {
            return Err(connection_error(address, message));
        };

        warn!(
            %address,
            script = %startup.script.display(),
            "compute runtime unreachable, starting it locally"
        );
        self.runtime.start_local(&startup.script)?;

        match self.runtime.connect(address) {
            Ok(()) => Ok(()),
            Err(RuntimeError::Connection(message)) => Err(connection_error(address, message)),
            Err(other) => Err(other.into()),
        }
    }

    fn register_final_push<T>(
        &self,
        ctx: &JobContext,
        synchronizer: &Arc<DirectorySynchronizer<T>>,
        lifecycle: &mut dyn TrainingLifecycle,
    ) where
        T: RemoteTransport + 'static,
    {
        let synchronizer = Arc::clone(synchronizer);
        let state = Arc::clone(&self.state);
        let outcome = Arc::clone(&self.final_push);
        let span = ctx.span().clone();
        let worker_dir = self.options.worker_results_dir().to_string();
        let driver_dir = self.options.results_dir.clone();
        let exclude = ctx.config().sync.exclude.clone();

        lifecycle.on_complete(Box::new(move || {
            let _enter = span.enter();
            transition(&state, OrchestratorState::SyncingBack);
            synchronizer.mark_training_ended();

            let pushed = synchronizer.push(&worker_dir, &driver_dir, &exclude);
            if !pushed {
                error!(
                    results_dir = %driver_dir,
                    "final sync failed, run `ray-quickstart sync-back` to retry"
                );
            }
            *outcome.lock().unwrap_or_else(PoisonError::into_inner) = Some(pushed);
            transition(&state, OrchestratorState::Done);
        }));
    }
}

fn transition(state: &Mutex<OrchestratorState>, next: OrchestratorState) {
    let mut current = state.lock().unwrap_or_else(PoisonError::into_inner);
    info!(from = current.as_str(), to = next.as_str(), "orchestrator state");
    *current = next;
}

/// `dir` as named on `endpoint`'s host
fn host_path(endpoint: &Endpoint, dir: &str) -> String {
    PathTranslator::normalize(strip_file_scheme(dir), endpoint.user(), endpoint.platform())
}

fn connection_error(address: &HeadAddress, message: String) -> SyncError {
    SyncError::Connection {
        address: address.to_string(),
        message,
    }
}
