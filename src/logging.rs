//! Logging configuration for portable-db.
//!
//! The interactive shell logs to a file so log lines never interleave with
//! the transcript. Batch runs log to stderr, keeping stdout for output.

use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::APP_DIR;

/// Initializes logging for the interactive shell.
///
/// Location: `~/.local/state/portable-db/portable-db.log` on Linux (XDG state
/// directory), or the platform-appropriate state/config directory elsewhere.
pub fn init_file_logging() {
    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            return;
        }
    }

    // Truncate on each run to avoid unbounded growth
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {e}");
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(log_file)
        .with_ansi(false)
        .init();
}

/// Initializes logging for batch mode.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(std::io::stderr)
        .init();
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Returns the path for the log file.
pub fn get_log_path() -> PathBuf {
    let file_name = format!("{APP_DIR}.log");

    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join(APP_DIR).join(file_name);
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join(APP_DIR).join(file_name);
    }

    std::env::temp_dir().join(file_name)
}
