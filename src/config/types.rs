//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::value_objects::{Endpoint, HeadAddress, Platform, SyncPolicy};
use crate::error::SyncResult;

use super::loader::{self, ConfigWarning};

/// Driver host: the machine orchestrating the job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    pub user: String,

    pub hostname_or_ip_address: String,

    #[serde(default = "default_ssh_port")]
    pub ssh_port: u16,

    /// Key on the driver used to reach the worker
    #[serde(default)]
    pub private_key_file: Option<PathBuf>,
}

/// Worker host: the machine executing training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub user: String,

    pub hostname_or_ip_address: String,

    #[serde(default = "default_ssh_port")]
    pub ssh_port: u16,

    /// Required; never defaulted to the local platform
    pub platform: Platform,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub setup_commands: Vec<String>,

    /// Key on the worker used to reach the driver
    #[serde(default)]
    pub private_key_file: Option<PathBuf>,
}

/// Compute runtime head node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RayHeadConfig {
    pub hostname_or_ip_address: String,

    #[serde(default = "default_client_server_port")]
    pub client_server_port: u16,
}

/// When results are pushed back to the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    EndOnly,
    Periodic,
}

/// Sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub policy: PolicyKind,

    #[serde(default = "default_period_secs")]
    pub period_secs: u64,

    /// Patterns never pushed back to the driver
    #[serde(default, deserialize_with = "null_as_empty")]
    pub exclude: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            period_secs: default_period_secs(),
            exclude: Vec::new(),
        }
    }
}

fn default_ssh_port() -> u16 {
    22
}

fn default_client_server_port() -> u16 {
    10001
}

fn default_period_secs() -> u64 {
    300
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RayConfig {
    pub driver: DriverConfig,

    pub worker: WorkerConfig,

    pub ray_head: RayHeadConfig,

    #[serde(default)]
    pub sync: SyncConfig,
}

impl RayConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> SyncResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> SyncResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Apply environment variable overrides (RAY_QUICKSTART_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// The driver as seen from the worker; the driver runs on `platform`
    pub fn driver_endpoint(&self, platform: Platform) -> Endpoint {
        let endpoint = Endpoint::new(
            &self.driver.user,
            &self.driver.hostname_or_ip_address,
            self.driver.ssh_port,
            platform,
        );
        match &self.worker.private_key_file {
            Some(key) => endpoint.with_private_key(key),
            None => endpoint,
        }
    }

    /// The worker as seen from the driver
    pub fn worker_endpoint(&self) -> Endpoint {
        let endpoint = Endpoint::new(
            &self.worker.user,
            &self.worker.hostname_or_ip_address,
            self.worker.ssh_port,
            self.worker.platform,
        );
        match &self.driver.private_key_file {
            Some(key) => endpoint.with_private_key(key),
            None => endpoint,
        }
    }

    pub fn head_address(&self) -> HeadAddress {
        HeadAddress::new(
            &self.ray_head.hostname_or_ip_address,
            self.ray_head.client_server_port,
        )
    }

    pub fn sync_policy(&self) -> SyncPolicy {
        match self.sync.policy {
            PolicyKind::EndOnly => SyncPolicy::EndOnly,
            PolicyKind::Periodic => {
                SyncPolicy::Periodic(Duration::from_secs(self.sync.period_secs))
            }
        }
    }
}
