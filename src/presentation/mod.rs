//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Wiring infrastructure into use cases for each command
//! - Output formatting (text/JSON)

pub mod cli;
pub mod commands;
pub mod output;

pub use cli::{Cli, Commands};
pub use commands::execute;
pub use output::OutputFormat;
