//! Ray QuickStart CLI
//!
//! Usage: ray-quickstart <COMMAND>
//!
//! Commands:
//!   normalize        Translate a path into its form on another host
//!   find-checkpoint  Print the checkpoint directory enclosing a path
//!   run              Prepare the worker, run training, pull results back
//!   sync-back        Retry the final push of results to the driver

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use ray_quickstart::logging;
use ray_quickstart::presentation::{execute, Cli, OutputFormat};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.log_file.as_deref()).context("failed to open log file")?;

    let format = OutputFormat::from_json_flag(cli.json);
    if execute(cli.command, format)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
