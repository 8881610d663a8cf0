//! Output Rendering
//!
//! Every command produces a serializable report, printed as JSON with
//! `--json` and as a few human-readable lines otherwise.

use std::fmt::Write as _;

use serde::Serialize;

use crate::application::{OrchestratorState, SyncStatus};

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// A command result that knows its text form
pub trait Report: Serialize {
    fn to_text(&self) -> String;
}

/// Render `report` in `format`
pub fn render<R: Report>(report: &R, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report),
        OutputFormat::Text => Ok(report.to_text()),
    }
}

#[derive(Debug, Serialize)]
pub struct NormalizeReport {
    pub input: String,
    pub platform: String,
    pub path: String,
}

impl Report for NormalizeReport {
    fn to_text(&self) -> String {
        self.path.clone()
    }
}

#[derive(Debug, Serialize)]
pub struct CheckpointReport {
    pub input: String,
    pub checkpoint_root: String,
}

impl Report for CheckpointReport {
    fn to_text(&self) -> String {
        self.checkpoint_root.clone()
    }
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub state: OrchestratorState,
    /// None when the training process was killed by a signal
    pub training_exit_code: Option<i32>,
    pub final_push: Option<bool>,
    pub sync: SyncStatus,
}

impl Report for RunReport {
    fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "state: {}", self.state);
        match self.training_exit_code {
            Some(code) => {
                let _ = writeln!(out, "training exit code: {}", code);
            }
            None => out.push_str("training exit code: none\n"),
        }
        out.push_str(&push_line(self.final_push));
        out.trim_end().to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct SyncBackReport {
    pub pushed: bool,
    pub sync: SyncStatus,
}

impl Report for SyncBackReport {
    fn to_text(&self) -> String {
        push_line(Some(self.pushed)).trim_end().to_string()
    }
}

fn push_line(pushed: Option<bool>) -> String {
    match pushed {
        Some(true) => "results synced to driver\n".to_string(),
        Some(false) => "results NOT synced, retry with `ray-quickstart sync-back`\n".to_string(),
        None => "results not synced, training did not report completion\n".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_report_mentions_retry_on_failure() {
        let report = SyncBackReport {
            pushed: false,
            sync: SyncStatus::default(),
        };
        let text = render(&report, OutputFormat::Text).unwrap();
        assert!(text.contains("sync-back"));
    }

    #[test]
    fn json_run_report_uses_snake_case_state() {
        let report = RunReport {
            state: OrchestratorState::Done,
            training_exit_code: Some(0),
            final_push: Some(true),
            sync: SyncStatus::default(),
        };
        let json = render(&report, OutputFormat::from_json_flag(true)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["state"], "done");
        assert_eq!(value["final_push"], true);
        assert_eq!(value["sync"]["training_ended"], false);
    }

    #[test]
    fn normalize_text_is_bare_path() {
        let report = NormalizeReport {
            input: "~".to_string(),
            platform: "linux".to_string(),
            path: "/home/alice".to_string(),
        };
        assert_eq!(render(&report, OutputFormat::Text).unwrap(), "/home/alice");
    }
}
