//! Recording test doubles for the transport and runtime ports

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::ports::{ComputeRuntime, CopyRequest, RemoteTransport};
use crate::domain::value_objects::{Endpoint, HeadAddress};
use crate::error::{RuntimeError, TransportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Copy(CopyRequest),
    Exec { login: String, command: String },
}

/// Transport that records calls and optionally fails them
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    pub calls: Arc<Mutex<Vec<TransportCall>>>,
    pub fail_copy: bool,
    pub fail_exec: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_copy: true,
            fail_exec: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn copies(&self) -> Vec<CopyRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::Copy(request) => Some(request),
                TransportCall::Exec { .. } => None,
            })
            .collect()
    }
}

impl RemoteTransport for RecordingTransport {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn copy(&self, request: &CopyRequest) -> Result<(), TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push(TransportCall::Copy(request.clone()));
        if self.fail_copy {
            return Err(TransportError::CommandFailed {
                program: "rsync".to_string(),
                target: request.destination.to_string(),
                code: Some(255),
                stderr: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn exec(&self, endpoint: &Endpoint, command: &str) -> Result<String, TransportError> {
        self.calls.lock().unwrap().push(TransportCall::Exec {
            login: endpoint.login(),
            command: command.to_string(),
        });
        if self.fail_exec {
            return Err(TransportError::CommandFailed {
                program: "ssh".to_string(),
                target: endpoint.login(),
                code: Some(1),
                stderr: "command not found".to_string(),
            });
        }
        Ok(String::new())
    }
}

/// Runtime returning scripted connect results in order
#[derive(Default)]
pub struct ScriptedRuntime {
    pub connect_results: Mutex<VecDeque<Result<(), RuntimeError>>>,
    pub connect_attempts: Mutex<usize>,
    pub started: Mutex<Vec<PathBuf>>,
    pub start_fails: bool,
    pub connected: AtomicBool,
}

impl ScriptedRuntime {
    pub fn with_results(results: Vec<Result<(), RuntimeError>>) -> Self {
        Self {
            connect_results: Mutex::new(results.into()),
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> usize {
        *self.connect_attempts.lock().unwrap()
    }

    pub fn started(&self) -> Vec<PathBuf> {
        self.started.lock().unwrap().clone()
    }
}

impl ComputeRuntime for ScriptedRuntime {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn connect(&self, _address: &HeadAddress) -> Result<(), RuntimeError> {
        *self.connect_attempts.lock().unwrap() += 1;
        let result = self
            .connect_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()));
        if result.is_ok() {
            self.connected.store(true, Ordering::SeqCst);
        }
        result
    }

    fn start_local(&self, script: &Path) -> Result<(), RuntimeError> {
        self.started.lock().unwrap().push(script.to_path_buf());
        if self.start_fails {
            return Err(RuntimeError::Startup("exit 1".to_string()));
        }
        Ok(())
    }
}
