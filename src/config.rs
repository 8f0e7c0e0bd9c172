//! Configuration management for portable-db.
//!
//! Handles loading configuration from a TOML file. Every field has a default,
//! so a missing file or a missing section is never an error.

use crate::error::{Result, ShellError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application directory name under the platform config and state dirs.
pub const APP_DIR: &str = "portable-db";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Database file settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Backup settings.
    #[serde(default)]
    pub backup: BackupConfig,

    /// Interactive shell settings.
    #[serde(default)]
    pub shell: ShellConfig,
}

/// Database file configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Path of the SQLite file, created when missing.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("portable_data.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Backup configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BackupConfig {
    /// Directory for backup files. Defaults to the database file's directory.
    pub dir: Option<PathBuf>,
}

/// Interactive shell configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShellConfig {
    /// Prompt shown before each line.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Line history file. Defaults to the platform state directory.
    pub history_file: Option<PathBuf>,

    /// Maximum number of history entries kept.
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

fn default_prompt() -> String {
    "db> ".to_string()
}

fn default_history_size() -> usize {
    500
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            history_file: None,
            history_size: default_history_size(),
        }
    }
}

impl ShellConfig {
    /// Returns the configured history file or the platform default.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file.clone().or_else(|| {
            dirs::state_dir()
                .or_else(dirs::data_local_dir)
                .map(|dir| dir.join(APP_DIR).join("history.txt"))
        })
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ShellError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ShellError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Directory backups are written to.
    pub fn backup_dir(&self) -> PathBuf {
        self.backup.dir.clone().unwrap_or_else(|| {
            self.database
                .path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }

    /// Applies the `--database` override.
    pub fn with_database(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.database.path = path;
        }
        self
    }
}
