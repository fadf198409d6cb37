//! CLI module for Insight
//!
//! Provides command-line interface parsing for the insight-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Insight - Streaming Research Agent Server
///
/// Plans web searches for a question, gathers deduplicated evidence and
/// streams a cited answer.
#[derive(Parser, Debug)]
#[command(
    name = "insight-server",
    version,
    about = "Insight - Streaming Research Agent Server",
    long_about = "Plans web searches for a question, gathers deduplicated evidence and streams\n\
                  a cited answer over Server-Sent Events.\n\n\
                  Run without arguments to start the server, or use 'ask' to answer one question in the terminal.",
    after_help = "EXAMPLES:\n    \
                  insight-server                         # Start the server (reads insight.toml)\n    \
                  insight-server --config my.toml        # Use a custom config file\n    \
                  insight-server ask \"What is WebGPU?\"   # Answer one question in the terminal\n    \
                  insight-server config --validate       # Check the configuration"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "insight.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Answer a single question in the terminal
    Ask {
        /// The question to research
        query: String,
    },

    /// Show configuration information
    Config {
        /// Only validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
