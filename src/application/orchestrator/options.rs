//! Orchestrator options

use std::path::{Path, PathBuf};

use crate::domain::value_objects::Platform;

/// Files copied to the worker so it can rebuild the Python environment
pub const RUNTIME_CONFIG_FILES: [&str; 2] = ["Pipfile", "requirements.txt"];

/// Script that starts a head process on this machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStartup {
    /// Only a driver on this platform may run the script
    pub platform: Platform,
    pub script: PathBuf,
}

impl LocalStartup {
    pub fn new(platform: Platform, script: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            script: script.into(),
        }
    }

    /// `scripts/ray_start.bat` under `base_dir`, for Windows drivers
    pub fn windows_default(base_dir: &Path) -> Self {
        Self::new(
            Platform::Windows,
            base_dir.join("scripts").join("ray_start.bat"),
        )
    }
}

/// Options for one orchestrated job
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Project directory holding the runtime-configuration files
    pub base_dir: PathBuf,
    /// Results directory as named on the driver
    pub results_dir: String,
    /// Results directory as named on the worker (defaults to `results_dir`)
    pub worker_results_dir: Option<String>,
    /// Empty both results directories before the job
    pub clean_results_at_start: bool,
    pub runtime_config_files: Vec<String>,
    /// Fallback used when the head is unreachable
    pub local_startup: Option<LocalStartup>,
}

impl OrchestratorOptions {
    pub fn new(base_dir: impl Into<PathBuf>, results_dir: impl Into<String>) -> Self {
        let base_dir = base_dir.into();
        Self {
            local_startup: Some(LocalStartup::windows_default(&base_dir)),
            base_dir,
            results_dir: results_dir.into(),
            worker_results_dir: None,
            clean_results_at_start: true,
            runtime_config_files: RUNTIME_CONFIG_FILES.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn with_worker_results_dir(mut self, dir: impl Into<String>) -> Self {
        self.worker_results_dir = Some(dir.into());
        self
    }

    pub fn with_clean_results_at_start(mut self, clean: bool) -> Self {
        self.clean_results_at_start = clean;
        self
    }

    pub fn with_local_startup(mut self, startup: Option<LocalStartup>) -> Self {
        self.local_startup = startup;
        self
    }

    pub fn with_runtime_config_files(mut self, files: Vec<String>) -> Self {
        self.runtime_config_files = files;
        self
    }

    pub fn worker_results_dir(&self) -> &str {
        self.worker_results_dir
            .as_deref()
            .unwrap_or(&self.results_dir)
    }
}
