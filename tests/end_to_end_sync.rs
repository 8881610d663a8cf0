//! End-to-end job against a loopback worker.
//!
//! The worker is `localhost`, so the orchestrator picks the local transport
//! and every transfer is a real directory mirror inside a temp dir.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use ray_quickstart::application::{
    JobContext, OrchestratorOptions, OrchestratorState, SyncOrchestrator,
};
use ray_quickstart::config::RayConfig;
use ray_quickstart::domain::ports::ComputeRuntime;
use ray_quickstart::domain::services::{mark_checkpoint, CheckpointRootLocator};
use ray_quickstart::domain::value_objects::{HeadAddress, Platform};
use ray_quickstart::infrastructure::{detect_transport, TrainingHooks};
use ray_quickstart::RuntimeError;
use tempfile::tempdir;

/// Runtime that is always reachable
#[derive(Default)]
struct ReachableRuntime {
    connected: AtomicBool,
}

impl ComputeRuntime for ReachableRuntime {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn connect(&self, _address: &HeadAddress) -> Result<(), RuntimeError> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn start_local(&self, _script: &Path) -> Result<(), RuntimeError> {
        Ok(())
    }
}

fn loopback_config(setup_marker: &Path) -> RayConfig {
    let yaml = format!(
        r#"
driver:
  user: alice
  hostname_or_ip_address: localhost
worker:
  user: alice
  hostname_or_ip_address: localhost
  platform: {platform}
  setup_commands:
    - touch '{marker}'
ray_head:
  hostname_or_ip_address: localhost
sync:
  exclude: ['*.tmp', 'scratch/']
"#,
        platform = Platform::current(),
        marker = setup_marker.display(),
    );
    serde_yaml_ng::from_str(&yaml).unwrap()
}

/// Every file and directory under `root`, relative and sorted
fn tree(root: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            out.push(path.strip_prefix(root).unwrap().display().to_string());
            if path.is_dir() {
                walk(root, &path, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}

#[test]
fn job_cleans_trains_and_syncs_back() {
    let temp = tempdir().unwrap();
    let driver_results: PathBuf = temp.path().join("driver/ray_results");
    let worker_results: PathBuf = temp.path().join("worker/ray_results");
    let base_dir = temp.path().join("proj");
    let setup_marker = temp.path().join("setup_ran");

    // Leftovers from a previous run on both sides
    fs::create_dir_all(driver_results.join("old_trial")).unwrap();
    fs::write(driver_results.join("old_trial/result.json"), "{}").unwrap();
    fs::create_dir_all(worker_results.join("old_trial")).unwrap();
    fs::write(worker_results.join("old_trial/result.json"), "{}").unwrap();

    fs::create_dir_all(&base_dir).unwrap();
    fs::write(base_dir.join("Pipfile"), "[packages]").unwrap();

    let ctx = JobContext::new(loopback_config(&setup_marker));
    let transport = detect_transport(&ctx.config().worker_endpoint()).unwrap();
    assert_eq!(transport.name(), "local");

    let options = OrchestratorOptions::new(&base_dir, driver_results.display().to_string())
        .with_worker_results_dir(worker_results.display().to_string())
        .with_local_startup(None);
    let orchestrator = SyncOrchestrator::new(ReachableRuntime::default(), options);
    let mut hooks = TrainingHooks::new();

    let synchronizer = orchestrator.run(&ctx, transport, &mut hooks).unwrap();

    assert_eq!(orchestrator.state(), OrchestratorState::Ready);
    assert!(tree(&driver_results).is_empty());
    assert!(tree(&worker_results).is_empty());
    assert!(setup_marker.exists());
    assert_eq!(
        fs::read_to_string(base_dir.join("Pipfile")).unwrap(),
        "[packages]"
    );

    // Pushing before training ends is refused
    assert!(!synchronizer.push(
        &worker_results.display().to_string(),
        &driver_results.display().to_string(),
        &[],
    ));

    // Training writes results on the worker
    let checkpoint = worker_results.join("trial_0001/checkpoint_000002");
    mark_checkpoint(&checkpoint).unwrap();
    fs::write(checkpoint.join("model.pt"), b"weights").unwrap();
    fs::write(worker_results.join("trial_0001/progress.csv"), "loss\n0.1\n").unwrap();
    fs::write(worker_results.join("trial_0001/events.tmp"), "partial").unwrap();
    fs::create_dir_all(worker_results.join("trial_0001/scratch")).unwrap();
    fs::write(worker_results.join("trial_0001/scratch/buf.bin"), b"x").unwrap();

    assert_eq!(hooks.complete(), 1);

    assert_eq!(orchestrator.state(), OrchestratorState::Done);
    assert_eq!(orchestrator.final_push_succeeded(), Some(true));
    assert_eq!(
        tree(&driver_results),
        vec![
            "trial_0001",
            "trial_0001/checkpoint_000002",
            "trial_0001/checkpoint_000002/.is_checkpoint",
            "trial_0001/checkpoint_000002/model.pt",
            "trial_0001/progress.csv",
        ]
    );

    // The relocated checkpoint is still recognizable on the driver
    let local_checkpoint = driver_results.join("trial_0001/checkpoint_000002");
    let root = CheckpointRootLocator::for_current_platform()
        .find_checkpoint_root(local_checkpoint.join("model.pt").to_str().unwrap())
        .unwrap();
    assert_eq!(root, local_checkpoint);

    // Results are never deleted after training ends
    assert!(!synchronizer.delete(&worker_results.display().to_string()));
    assert!(worker_results.join("trial_0001").exists());
}

#[test]
fn attached_runtime_leaves_results_alone() {
    let temp = tempdir().unwrap();
    let driver_results = temp.path().join("driver");
    fs::create_dir_all(&driver_results).unwrap();
    fs::write(driver_results.join("keep.json"), "{}").unwrap();

    let ctx = JobContext::new(loopback_config(&temp.path().join("marker")));
    let transport = detect_transport(&ctx.config().worker_endpoint()).unwrap();
    let runtime = ReachableRuntime::default();
    runtime.connected.store(true, Ordering::SeqCst);

    let orchestrator = SyncOrchestrator::new(
        runtime,
        OrchestratorOptions::new(temp.path(), driver_results.display().to_string()),
    );
    orchestrator
        .run(&ctx, transport, &mut TrainingHooks::new())
        .unwrap();

    assert!(driver_results.join("keep.json").exists());
    assert!(!temp.path().join("marker").exists());
}
