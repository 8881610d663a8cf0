//! Ray head runtime
//!
//! Attaches to the head node by checking that its client-server port
//! accepts TCP connections. A local head can be started by running the
//! platform's startup script.

use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::ports::ComputeRuntime;
use crate::domain::value_objects::HeadAddress;
use crate::error::RuntimeError;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Runtime reachable at a head node's client-server port
#[derive(Debug)]
pub struct RayHeadRuntime {
    connected: AtomicBool,
    timeout: Duration,
}

impl Default for RayHeadRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl RayHeadRuntime {
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
            timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl ComputeRuntime for RayHeadRuntime {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn connect(&self, address: &HeadAddress) -> Result<(), RuntimeError> {
        let addrs = address
            .socket_addr()
            .to_socket_addrs()
            .map_err(|e| RuntimeError::Connection(format!("cannot resolve {}: {}", address, e)))?;

        let mut last_error = format!("{} resolved to no addresses", address);
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(_) => {
                    info!(%address, "connected to compute runtime head");
                    self.connected.store(true, Ordering::SeqCst);
                    return Ok(());
                }
                Err(e) => {
                    warn!(%addr, error = %e, "head address unreachable");
                    last_error = e.to_string();
                }
            }
        }

        Err(RuntimeError::Connection(last_error))
    }

    fn start_local(&self, script: &Path) -> Result<(), RuntimeError> {
        info!(script = %script.display(), "starting local compute runtime");
        let status = Command::new(script)
            .status()
            .map_err(|e| RuntimeError::Startup(format!("{}: {}", script.display(), e)))?;
        if !status.success() {
            return Err(RuntimeError::Startup(format!(
                "{} exited with {:?}",
                script.display(),
                status.code()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn connects_to_listening_port() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let runtime = RayHeadRuntime::new();
        assert!(!runtime.is_connected());
        runtime
            .connect(&HeadAddress::new("127.0.0.1", port))
            .unwrap();
        assert!(runtime.is_connected());
    }

    #[test]
    fn closed_port_is_a_connection_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let runtime = RayHeadRuntime::new().with_timeout(Duration::from_millis(200));
        let err = runtime
            .connect(&HeadAddress::new("127.0.0.1", port))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Connection(_)));
        assert!(!runtime.is_connected());
    }

    #[test]
    fn missing_startup_script_fails() {
        let runtime = RayHeadRuntime::new();
        let err = runtime
            .start_local(Path::new("/nonexistent/scripts/ray_start.bat"))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Startup(_)));
    }
}
