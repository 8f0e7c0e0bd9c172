//! Error types for portable-db.
//!
//! Defines the main error enum used throughout the shell and its collaborators.

use thiserror::Error;

use crate::commands::tokenizer::ParseError;

/// Main error type for portable-db operations.
///
/// Display output is the bare message; the shell adds the `Error:` or
/// `Usage:` prefix when it writes the transcript.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Wrong or missing command arguments. Carries the usage line.
    #[error("{0}")]
    Usage(String),

    /// A referenced table or row does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Malformed input: bad key=value pair, empty import source, invalid identifier.
    #[error("{0}")]
    Validation(String),

    /// The storage engine rejected a statement.
    #[error("{0}")]
    Storage(String),

    /// File read/write failure during import, export or backup.
    #[error("{0}")]
    Io(String),

    /// The command line could not be tokenized.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// Configuration errors (invalid config file, unreadable paths, etc.)
    #[error("{0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("{0}")]
    Internal(String),
}

impl ShellError {
    /// Creates a usage error from a usage line (without the `Usage:` prefix).
    pub fn usage(usage: impl Into<String>) -> Self {
        Self::Usage(usage.into())
    }

    /// Creates a not-found error with the given message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Creates a validation error with the given message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a storage error with the given message.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Creates an I/O error with the given message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Creates the standard "table not found" error.
    pub fn table_not_found(table: &str) -> Self {
        Self::NotFound(format!("Table '{table}' not found."))
    }

    /// Returns true for argument errors that render as a usage line.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Usage(_) => "Usage Error",
            Self::NotFound(_) => "Not Found",
            Self::Validation(_) => "Validation Error",
            Self::Storage(_) => "Storage Error",
            Self::Io(_) => "I/O Error",
            Self::Parse(_) => "Parse Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

impl From<sqlx::Error> for ShellError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(format_storage_error(&e))
    }
}

impl From<std::io::Error> for ShellError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<csv::Error> for ShellError {
    fn from(e: csv::Error) -> Self {
        Self::Io(format!("CSV error: {e}"))
    }
}

impl From<serde_json::Error> for ShellError {
    fn from(e: serde_json::Error) -> Self {
        Self::Validation(format!("Invalid JSON: {e}"))
    }
}

/// Extracts the engine's own message from a database error, falling back to
/// the driver's description for connection-level failures.
pub fn format_storage_error(e: &sqlx::Error) -> String {
    match e {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        other => other.to_string(),
    }
}

/// Result type alias using ShellError.
pub type Result<T> = std::result::Result<T, ShellError>;
