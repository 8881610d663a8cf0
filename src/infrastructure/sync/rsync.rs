//! Rsync Transport
//!
//! Mirrors directories with `rsync -avz` over ssh and runs remote
//! commands with `ssh`. This is the transport for real remote workers.

use std::process::{Command, Stdio};

use tracing::debug;

use super::ssh;
use crate::domain::ports::{CopyRequest, Filter, Location, RemoteTransport};
use crate::domain::value_objects::Endpoint;
use crate::error::TransportError;

/// Transport shelling out to `rsync` and `ssh`
#[derive(Debug, Clone, Copy, Default)]
pub struct RsyncTransport;

impl RsyncTransport {
    /// Check if rsync is installed and available
    pub fn check_available() -> bool {
        Command::new("rsync")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Arguments for the rsync invocation implementing `request`
    pub fn build_args(request: &CopyRequest) -> Result<Vec<String>, TransportError> {
        if request.source.endpoint().is_some() && request.destination.endpoint().is_some() {
            return Err(TransportError::Unsupported(format!(
                "both {} and {} are remote",
                request.source, request.destination
            )));
        }

        let mut args = vec!["-avz".to_string()];
        if request.delete_extraneous {
            args.push("--delete".to_string());
        }
        if let Some(endpoint) = request.remote_endpoint() {
            args.push("-e".to_string());
            args.push(ssh::remote_shell(endpoint));
        }
        for filter in &request.filters {
            args.push(match filter {
                Filter::Include(pattern) => format!("--include={}", pattern),
                Filter::Exclude(pattern) => format!("--exclude={}", pattern),
            });
        }
        // Trailing slash = copy contents
        args.push(contents_of(&request.source));
        args.push(contents_of(&request.destination));
        Ok(args)
    }
}

fn contents_of(location: &Location) -> String {
    let path = location.path();
    let path = if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    };
    match location {
        Location::Local(_) => path,
        Location::Remote { endpoint, .. } => endpoint.remote_spec(&path),
    }
}

impl RemoteTransport for RsyncTransport {
    fn name(&self) -> &'static str {
        "rsync"
    }

    fn copy(&self, request: &CopyRequest) -> Result<(), TransportError> {
        let args = Self::build_args(request)?;
        debug!(command = %format!("rsync {}", args.join(" ")), "running rsync");
        let output = ssh::run("rsync", &args, &request.destination.to_string())?;
        debug!("{}", String::from_utf8_lossy(&output.stdout));
        Ok(())
    }

    fn exec(&self, endpoint: &Endpoint, command: &str) -> Result<String, TransportError> {
        let args = ssh::exec_args(endpoint, command);
        let output = ssh::run("ssh", &args, &endpoint.login())?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
