//! Orchestrator lifecycle states

use std::fmt;

use serde::Serialize;

/// Phase of an orchestrated job; advances strictly forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorState {
    #[default]
    Uninitialized,
    CleaningResults,
    ConfiguringRemoteEnvironment,
    RuntimeInitializing,
    Ready,
    SyncingBack,
    Done,
}

impl OrchestratorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::CleaningResults => "cleaning_results",
            Self::ConfiguringRemoteEnvironment => "configuring_remote_environment",
            Self::RuntimeInitializing => "runtime_initializing",
            Self::Ready => "ready",
            Self::SyncingBack => "syncing_back",
            Self::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
