//! CLI Argument Parsing
//!
//! Global flags (--json, --verbose, --log-file) are inherited by all subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::value_objects::Platform;

/// Ray QuickStart - keeps training results in sync between driver and worker
#[derive(Parser, Debug)]
#[command(name = "ray-quickstart")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a path into its form on another host
    Normalize {
        /// Path to translate (`~`, `~/...`, or another platform's home path)
        path: String,

        /// User owning the home directory on the target host
        #[arg(long)]
        user: String,

        /// Platform of the target host
        #[arg(long, value_enum)]
        platform: Platform,
    },

    /// Print the checkpoint directory enclosing a file or directory
    FindCheckpoint {
        /// File or directory inside a checkpoint
        path: String,

        /// Platform whose home layout the path is resolved against (default: this host)
        #[arg(long, value_enum)]
        platform: Option<Platform>,
    },

    /// Prepare the worker, run training, then pull results back
    Run {
        /// Path to the job configuration
        #[arg(short, long, default_value = "config/ray_config.yaml")]
        config: PathBuf,

        /// Project directory holding Pipfile / requirements.txt
        #[arg(long, default_value = ".")]
        base_dir: PathBuf,

        /// Results directory on the driver
        #[arg(long, default_value = "~/ray_results")]
        results_dir: String,

        /// Results directory on the worker (default: same as --results-dir)
        #[arg(long)]
        worker_results_dir: Option<String>,

        /// Keep results left by previous runs
        #[arg(long)]
        no_clean: bool,

        /// Local head startup script (default: <base-dir>/scripts/ray_start.bat on Windows)
        #[arg(long)]
        startup_script: Option<PathBuf>,

        /// Training command and its arguments
        #[arg(last = true, required = true, num_args = 1..)]
        command: Vec<String>,
    },

    /// Push results from the worker again after a failed final sync
    SyncBack {
        /// Path to the job configuration
        #[arg(short, long, default_value = "config/ray_config.yaml")]
        config: PathBuf,

        /// Results directory on the driver
        #[arg(long, default_value = "~/ray_results")]
        results_dir: String,

        /// Results directory on the worker (default: same as --results-dir)
        #[arg(long)]
        worker_results_dir: Option<String>,
    },
}
