//! CLI module for tableqa
//!
//! Provides command-line interface for:
//! - ask: Answer a question about a dataset
//! - exec: Execute a plan read from stdin
//! - describe: Print a dataset summary
//! - serve: Run the HTTP server

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{ask, describe, exec, run, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_response};
