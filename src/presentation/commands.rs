//! Command handlers
//!
//! Each handler wires infrastructure into the application layer, prints a
//! report, and tells `main` whether the process should exit successfully.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::warn;

use crate::application::{
    DirectorySynchronizer, JobContext, LocalStartup, OrchestratorOptions, Side, SyncOrchestrator,
};
use crate::config::RayConfig;
use crate::domain::ports::RemoteTransport;
use crate::domain::services::{CheckpointRootLocator, PathTranslator};
use crate::domain::value_objects::Platform;
use crate::infrastructure::{detect_transport, CommandLifecycle, RayHeadRuntime};

use super::cli::Commands;
use super::output::{
    render, CheckpointReport, NormalizeReport, OutputFormat, Report, RunReport, SyncBackReport,
};

/// Run `command`; `Ok(false)` means the command ran but failed its job
pub fn execute(command: Commands, format: OutputFormat) -> Result<bool> {
    match command {
        Commands::Normalize {
            path,
            user,
            platform,
        } => cmd_normalize(path, &user, platform, format),
        Commands::FindCheckpoint { path, platform } => cmd_find_checkpoint(path, platform, format),
        Commands::Run {
            config,
            base_dir,
            results_dir,
            worker_results_dir,
            no_clean,
            startup_script,
            command,
        } => {
            let mut options = OrchestratorOptions::new(base_dir, results_dir)
                .with_clean_results_at_start(!no_clean);
            if let Some(dir) = worker_results_dir {
                options = options.with_worker_results_dir(dir);
            }
            if let Some(script) = startup_script {
                options =
                    options.with_local_startup(Some(LocalStartup::new(Platform::current(), script)));
            }
            cmd_run(&config, options, &command, format)
        }
        Commands::SyncBack {
            config,
            results_dir,
            worker_results_dir,
        } => cmd_sync_back(&config, &results_dir, worker_results_dir.as_deref(), format),
    }
}

fn print<R: Report>(report: &R, format: OutputFormat) -> Result<()> {
    println!("{}", render(report, format)?);
    Ok(())
}

fn cmd_normalize(path: String, user: &str, platform: Platform, format: OutputFormat) -> Result<bool> {
    let normalized = PathTranslator::normalize(&path, user, platform);
    print(
        &NormalizeReport {
            input: path,
            platform: platform.to_string(),
            path: normalized,
        },
        format,
    )?;
    Ok(true)
}

fn cmd_find_checkpoint(
    path: String,
    platform: Option<Platform>,
    format: OutputFormat,
) -> Result<bool> {
    let locator = platform
        .map(CheckpointRootLocator::new)
        .unwrap_or_else(CheckpointRootLocator::for_current_platform);
    let root = locator.find_checkpoint_root(&path)?;
    print(
        &CheckpointReport {
            input: path,
            checkpoint_root: root.display().to_string(),
        },
        format,
    )?;
    Ok(true)
}

fn load_context(config_path: &Path) -> Result<JobContext> {
    let (config, warnings) = RayConfig::load_with_warnings(config_path)?;
    for warning in &warnings {
        match &warning.suggestion {
            Some(suggestion) => warn!(
                key = %warning.key,
                line = ?warning.line,
                "unknown config key, did you mean '{}'?",
                suggestion
            ),
            None => warn!(key = %warning.key, line = ?warning.line, "unknown config key"),
        }
    }
    Ok(JobContext::new(config.with_env_overrides()))
}

fn transport_for(ctx: &JobContext) -> Result<Box<dyn RemoteTransport>> {
    let worker = ctx.config().worker_endpoint();
    detect_transport(&worker)
        .ok_or_else(|| anyhow!("rsync is not installed; it is required to reach {}", worker))
}

fn cmd_run(
    config_path: &Path,
    options: OrchestratorOptions,
    command: &[String],
    format: OutputFormat,
) -> Result<bool> {
    let ctx = load_context(config_path)?;
    let transport = transport_for(&ctx)?;

    let working_dir: PathBuf = options.base_dir.clone();
    let mut lifecycle = CommandLifecycle::new(command)
        .ok_or_else(|| anyhow!("no training command given"))?
        .with_working_dir(working_dir);

    let orchestrator = SyncOrchestrator::new(RayHeadRuntime::new(), options);
    let synchronizer = orchestrator
        .run(&ctx, transport, &mut lifecycle)
        .context("failed to prepare the job")?;

    let status = lifecycle
        .run()
        .with_context(|| format!("failed to run training command '{}'", command.join(" ")))?;

    let report = RunReport {
        state: orchestrator.state(),
        training_exit_code: status.code(),
        final_push: orchestrator.final_push_succeeded(),
        sync: synchronizer.status(),
    };
    print(&report, format)?;

    Ok(status.success() && report.final_push == Some(true))
}

fn cmd_sync_back(
    config_path: &Path,
    results_dir: &str,
    worker_results_dir: Option<&str>,
    format: OutputFormat,
) -> Result<bool> {
    let ctx = load_context(config_path)?;
    let transport = transport_for(&ctx)?;
    let synchronizer = DirectorySynchronizer::from_context(&ctx, transport, Side::Driver);

    synchronizer.mark_training_ended();
    let pushed = synchronizer.push(
        worker_results_dir.unwrap_or(results_dir),
        results_dir,
        &ctx.config().sync.exclude,
    );

    print(
        &SyncBackReport {
            pushed,
            sync: synchronizer.status(),
        },
        format,
    )?;
    Ok(pushed)
}
