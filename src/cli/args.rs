//! CLI argument definitions using clap
//!
//! Commands:
//! - tableqa ask --file <path> --question <text>
//! - tableqa exec --file <path>   (plan JSON on stdin)
//! - tableqa describe --file <path>
//! - tableqa serve [--port <port>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tableqa - answer questions about CSV and SQLite datasets
#[derive(Parser, Debug)]
#[command(name = "tableqa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer a natural-language question about a dataset
    Ask {
        /// CSV or SQLite file
        #[arg(long)]
        file: PathBuf,

        /// Question to answer
        #[arg(long)]
        question: String,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Execute one plan read from stdin against a dataset
    Exec {
        /// CSV or SQLite file
        #[arg(long)]
        file: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the summary a translator sees of a dataset
    Describe {
        /// CSV or SQLite file
        #[arg(long)]
        file: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port override
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
