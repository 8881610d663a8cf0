//! Endpoint value object - one side of a transfer relationship

use std::fmt;
use std::path::PathBuf;

use super::Platform;

/// Hosts treated as "this machine" when choosing a transport
const LOOPBACK_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "::1"];

/// Identity of a driver or worker host reachable over SSH
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    user: String,
    host: String,
    ssh_port: u16,
    platform: Platform,
    private_key_path: Option<PathBuf>,
}

impl Endpoint {
    pub fn new(
        user: impl Into<String>,
        host: impl Into<String>,
        ssh_port: u16,
        platform: Platform,
    ) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
            ssh_port,
            platform,
            private_key_path: None,
        }
    }

    /// Identity file used by ssh to reach this endpoint
    pub fn with_private_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.private_key_path = Some(path.into());
        self
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn ssh_port(&self) -> u16 {
        self.ssh_port
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn private_key_path(&self) -> Option<&PathBuf> {
        self.private_key_path.as_ref()
    }

    /// `user@host`, the ssh login target
    pub fn login(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// `user@host:path`, the rsync remote spec
    pub fn remote_spec(&self, path: &str) -> String {
        format!("{}:{}", self.login(), path)
    }

    /// True when the host names the local machine
    pub fn is_loopback(&self) -> bool {
        LOOPBACK_HOSTS.contains(&self.host.as_str())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} ({})", self.login(), self.ssh_port, self.platform)
    }
}
