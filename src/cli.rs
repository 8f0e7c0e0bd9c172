//! Command-line argument parsing for portable-db.
//!
//! Uses clap derive. Without `--command` or `--script` the binary starts the
//! interactive shell.

use clap::Parser;
use std::path::PathBuf;

/// A portable SQLite data manager with a command shell.
#[derive(Parser, Debug)]
#[command(name = "portable-db")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file (overrides the config file)
    #[arg(short = 'd', long, value_name = "PATH", env = "PORTABLE_DB_DATABASE")]
    pub database: Option<PathBuf>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Shell command to run; may be repeated. Runs in batch mode and exits.
    #[arg(short = 'e', long = "command", value_name = "LINE")]
    pub commands: Vec<String>,

    /// Script file with one shell command per line (use "-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub script: Option<String>,

    /// Use a private in-memory database instead of a file
    #[arg(long, conflicts_with = "database")]
    pub in_memory: bool,

    /// Do not read or write the line history file
    #[arg(long)]
    pub no_history: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Returns true when lines come from `--command` or `--script`.
    pub fn is_batch(&self) -> bool {
        !self.commands.is_empty() || self.script.is_some()
    }
}
