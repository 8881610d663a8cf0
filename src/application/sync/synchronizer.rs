//! Directory synchronizer
//!
//! One-directional mirrors between the driver and the worker:
//! `push` copies worker → driver, `pull` copies driver → worker, and
//! `delete` removes a worker directory. Every operation is a blocking
//! call guarded by a non-blocking in-progress flag: a call made while
//! another transfer runs returns `false` immediately and is not queued.
//!
//! Transport failures never escape; they are logged with the target and
//! reported as `false`.

use chrono::Utc;
use tracing::{debug, error, info, Span};

use crate::application::JobContext;
use crate::domain::ports::{CopyRequest, Filter, Location, RemoteTransport};
use crate::domain::services::{strip_file_scheme, PathTranslator};
use crate::domain::value_objects::{Endpoint, SyncPolicy};
use crate::infrastructure::sync::remove_dir_command;

use super::status::{Side, SyncState, SyncStatus};

/// Mirrors directories between one driver and one worker
#[derive(Debug)]
pub struct DirectorySynchronizer<T: RemoteTransport> {
    transport: T,
    driver: Endpoint,
    worker: Endpoint,
    vantage: Side,
    policy: SyncPolicy,
    state: SyncState,
    span: Span,
}

impl<T: RemoteTransport> DirectorySynchronizer<T> {
    /// Synchronizer executed on `vantage`
    pub fn new(
        transport: T,
        driver: Endpoint,
        worker: Endpoint,
        vantage: Side,
        policy: SyncPolicy,
    ) -> Self {
        Self {
            transport,
            driver,
            worker,
            vantage,
            policy,
            state: SyncState::default(),
            span: Span::current(),
        }
    }

    /// Synchronizer for the job described by `ctx`
    pub fn from_context(ctx: &JobContext, transport: T, vantage: Side) -> Self {
        let config = ctx.config();
        Self {
            span: ctx.span().clone(),
            ..Self::new(
                transport,
                config.driver_endpoint(ctx.driver_platform()),
                config.worker_endpoint(),
                vantage,
                config.sync_policy(),
            )
        }
    }

    /// Copy `worker_dir` on the worker to `driver_dir` on the driver.
    ///
    /// Under `EndOnly` this is refused until [`mark_training_ended`] has
    /// been called. Under `Periodic` it is refused until the interval has
    /// elapsed since the last push, unless training has ended.
    ///
    /// [`mark_training_ended`]: Self::mark_training_ended
    pub fn push(&self, worker_dir: &str, driver_dir: &str, exclude: &[String]) -> bool {
        let _enter = self.span.enter();
        let Some(_guard) = self.state.try_begin() else {
            info!(worker_dir, "sync still in progress, skipping push");
            return false;
        };
        if !self.push_allowed() {
            info!(worker_dir, policy = ?self.policy, "push not due under sync policy");
            return false;
        }

        let request = CopyRequest::new(
            self.location(Side::Worker, worker_dir),
            self.location(Side::Driver, driver_dir),
        )
        .with_delete()
        .with_filters(Filter::excluding(exclude));

        info!(
            from = %request.source,
            to = %request.destination,
            "syncing from worker to driver"
        );
        if self.transfer("push", &request) {
            self.state.record_push(Utc::now());
            true
        } else {
            false
        }
    }

    /// Copy `driver_dir` on the driver to `worker_dir` on the worker.
    ///
    /// Only the in-progress guard applies; pulls seed the worker before
    /// training starts.
    pub fn pull(&self, driver_dir: &str, worker_dir: &str, exclude: &[String]) -> bool {
        let _enter = self.span.enter();
        let Some(_guard) = self.state.try_begin() else {
            info!(worker_dir, "sync still in progress, skipping pull");
            return false;
        };

        let request = CopyRequest::new(
            self.location(Side::Driver, driver_dir),
            self.location(Side::Worker, worker_dir),
        )
        .with_delete()
        .with_filters(Filter::excluding(exclude));

        info!(
            from = %request.source,
            to = %request.destination,
            "syncing from driver to worker"
        );
        if self.transfer("pull", &request) {
            self.state.record_pull(Utc::now());
            true
        } else {
            false
        }
    }

    /// Remove `worker_dir` on the worker. Refused once training has ended.
    pub fn delete(&self, worker_dir: &str) -> bool {
        let _enter = self.span.enter();
        let Some(_guard) = self.state.try_begin() else {
            info!(worker_dir, "sync still in progress, skipping deletion");
            return false;
        };
        if self.state.training_ended() {
            info!(worker_dir, "training has ended, refusing to delete results");
            return false;
        }

        let location = self.location(Side::Worker, worker_dir);
        info!(%location, "deleting worker directory");
        match &location {
            Location::Local(path) => match std::fs::remove_dir_all(path) {
                Ok(()) => true,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(path = %path, "nothing to delete");
                    true
                }
                Err(e) => {
                    error!(%location, error = %e, "error deleting directory");
                    false
                }
            },
            Location::Remote { endpoint, path } => {
                let command = remove_dir_command(endpoint.platform(), path);
                match self.transport.exec(endpoint, &command) {
                    Ok(_) => true,
                    Err(e) => {
                        error!(%location, error = %e, "error deleting directory");
                        false
                    }
                }
            }
        }
    }

    /// Record that training has ended. Idempotent.
    pub fn mark_training_ended(&self) {
        let _enter = self.span.enter();
        if self.state.end_training() {
            info!("training ended, results may now be pushed");
        }
    }

    pub fn is_training_ended(&self) -> bool {
        self.state.training_ended()
    }

    pub fn status(&self) -> SyncStatus {
        self.state.snapshot()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn driver(&self) -> &Endpoint {
        &self.driver
    }

    pub fn worker(&self) -> &Endpoint {
        &self.worker
    }

    pub fn vantage(&self) -> Side {
        self.vantage
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    fn push_allowed(&self) -> bool {
        let ended = self.state.training_ended();
        match self.policy {
            SyncPolicy::EndOnly => ended,
            SyncPolicy::Periodic(interval) => {
                if ended {
                    return true;
                }
                let Some(last) = self.state.last_push() else {
                    return true;
                };
                let elapsed = Utc::now().signed_duration_since(last);
                chrono::Duration::from_std(interval)
                    .map(|interval| elapsed >= interval)
                    .unwrap_or(false)
            }
        }
    }

    fn endpoint(&self, side: Side) -> &Endpoint {
        match side {
            Side::Driver => &self.driver,
            Side::Worker => &self.worker,
        }
    }

    /// `dir` translated for `side`, local when `side` runs this synchronizer
    fn location(&self, side: Side, dir: &str) -> Location {
        let endpoint = self.endpoint(side);
        let path = PathTranslator::normalize(
            strip_file_scheme(dir),
            endpoint.user(),
            endpoint.platform(),
        );
        if side == self.vantage {
            Location::Local(path)
        } else {
            Location::Remote {
                endpoint: endpoint.clone(),
                path,
            }
        }
    }

    fn transfer(&self, operation: &str, request: &CopyRequest) -> bool {
        match self.transport.copy(request) {
            Ok(()) => true,
            Err(e) => {
                error!(
                    operation,
                    transport = self.transport.name(),
                    destination = %request.destination,
                    error = %e,
                    "error syncing"
                );
                false
            }
        }
    }
}
