//! Presentation-agnostic command output types.
//!
//! Handlers return a `CommandOutput`; the shell renders it into transcript
//! lines. A GUI host could render the same value as a grid instead.

use crate::db::QueryResult;
use crate::error::ShellError;

/// Output from a command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Nothing to show.
    None,

    /// Informational message (success, status, etc.).
    Info(String),

    /// Error message, rendered with an `Error:` prefix.
    Error(String),

    /// Usage line, rendered with a `Usage:` prefix.
    Usage(String),

    /// Structured table data for display.
    Table {
        /// Column headers.
        headers: Vec<String>,
        /// Row data (each row is a vector of cell values).
        rows: Vec<Vec<String>>,
    },

    /// Shell control action.
    Control(ControlAction),
}

/// Control actions that affect the shell rather than the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Empty the transcript.
    ClearTranscript,

    /// Leave the shell.
    Exit,
}

impl CommandOutput {
    /// Creates an info message.
    pub fn info(msg: impl Into<String>) -> Self {
        Self::Info(msg.into())
    }

    /// Creates a table output.
    pub fn table(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self::Table { headers, rows }
    }

    /// Creates a table output from a query result, rendering NULL as `NULL`.
    pub fn from_result(result: &QueryResult) -> Self {
        let headers = result.columns.iter().map(|c| c.name.clone()).collect();
        let rows = result
            .rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_display_string()).collect())
            .collect();
        Self::Table { headers, rows }
    }

    /// Creates a clear-transcript control action.
    pub fn clear_transcript() -> Self {
        Self::Control(ControlAction::ClearTranscript)
    }

    /// Creates an exit control action.
    pub fn exit() -> Self {
        Self::Control(ControlAction::Exit)
    }

    /// Returns the control action carried by this output, if any.
    pub fn control(&self) -> Option<ControlAction> {
        match self {
            Self::Control(action) => Some(*action),
            _ => None,
        }
    }

    /// Renders the output as transcript lines.
    ///
    /// Tables are one tab-separated header line followed by one line per row.
    /// Control actions render nothing.
    pub fn render(&self) -> Vec<String> {
        match self {
            Self::None | Self::Control(_) => Vec::new(),
            Self::Info(msg) => msg.lines().map(str::to_string).collect(),
            Self::Error(msg) => vec![format!("Error: {msg}")],
            Self::Usage(usage) => vec![format!("Usage: {usage}")],
            Self::Table { headers, rows } => std::iter::once(headers.join("\t"))
                .chain(rows.iter().map(|row| row.join("\t")))
                .collect(),
        }
    }
}

impl From<ShellError> for CommandOutput {
    fn from(err: ShellError) -> Self {
        match err {
            ShellError::Usage(usage) => Self::Usage(usage),
            other => Self::Error(other.to_string()),
        }
    }
}
