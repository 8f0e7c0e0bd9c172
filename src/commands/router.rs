//! Command parsing and routing for the shell.
//!
//! Parses tokenized input into structured commands that can be dispatched to handlers.
//! Arity and argument-shape problems are reported here as usage errors so handlers
//! only see well-formed arguments.

use super::definitions::{find_command, usage, CommandKind};
use super::tokenizer::tokenize;
use crate::db::Value;
use crate::error::{Result, ShellError};

/// File format for import and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
}

impl DataFormat {
    /// Parses a format name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Returns the format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Ordered `column=value` assignments from one command invocation.
///
/// Keys are unique ignoring ASCII case, matching SQLite's column name rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignments {
    pairs: Vec<(String, String)>,
}

impl Assignments {
    /// Parses `key=value` tokens, splitting each on the first `=`.
    pub fn parse(tokens: &[String]) -> Result<Self> {
        let mut assignments = Self::default();
        for token in tokens {
            let (key, value) = split_pair(token)?;
            assignments.push(key, value)?;
        }
        Ok(assignments)
    }

    fn push(&mut self, key: &str, value: &str) -> Result<()> {
        if self.get(key).is_some() {
            return Err(ShellError::validation(format!(
                "Duplicate column '{key}' in assignments"
            )));
        }
        self.pairs.push((key.to_string(), value.to_string()));
        Ok(())
    }

    /// Returns the value assigned to a key, ignoring ASCII case.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Column names in input order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    /// Values in input order, as text parameters.
    pub fn values(&self) -> Vec<Value> {
        self.pairs
            .iter()
            .map(|(_, v)| Value::String(v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Splits a `key=value` token on the first `=`.
fn split_pair(token: &str) -> Result<(&str, &str)> {
    match token.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => Err(ShellError::validation(format!(
            "Malformed pair '{token}' (expected key=value)"
        ))),
    }
}

/// An opaque row identifier matched against SQLite's `rowid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowId(pub String);

impl RowId {
    /// Returns the id as a bind parameter: integer when it parses as one.
    pub fn to_value(&self) -> Value {
        match self.0.trim().parse::<i64>() {
            Ok(id) => Value::Int(id),
            Err(_) => Value::String(self.0.clone()),
        }
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Arguments for select command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectArgs {
    /// Table to read; defaults to the current table.
    pub table: Option<String>,
    /// Maximum number of rows.
    pub limit: Option<u64>,
}

/// Arguments for update command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateArgs {
    /// Row to update.
    pub id: RowId,
    /// Columns to set.
    pub set: Assignments,
}

/// Arguments for export command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArgs {
    pub format: DataFormat,
    pub path: String,
    /// Table to export; defaults to the current table.
    pub table: Option<String>,
}

/// Arguments for import command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportArgs {
    pub format: DataFormat,
    pub path: String,
    /// Destination table, created when absent.
    pub table: String,
}

/// Arguments for create command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateArgs {
    /// New table name.
    pub table: String,
    /// Column definitions, e.g. `name TEXT, age INTEGER`.
    pub columns: String,
}

/// Parsed command with arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show help message.
    Help,
    /// List tables.
    Tables,
    /// Select the current table.
    Use(String),
    /// Show a table's columns.
    Schema(Option<String>),
    /// Show rows.
    Select(SelectArgs),
    /// Insert a row into the current table.
    Insert(Assignments),
    /// Update a row of the current table.
    Update(UpdateArgs),
    /// Delete a row of the current table.
    Delete(RowId),
    /// Execute raw SQL directly.
    Sql(String),
    /// Export a table to a file.
    Export(ExportArgs),
    /// Import a file into a table.
    Import(ImportArgs),
    /// Back up the database file.
    Backup,
    /// Replace the database file with a backup.
    Restore(String),
    /// Show database information.
    Info,
    /// Clear the transcript.
    Clear,
    /// Create a table.
    Create(CreateArgs),
    /// Drop a table.
    Drop(String),
    /// Search the current table.
    Search(String),
    /// Count records in a table.
    Count(Option<String>),
    /// Leave the shell.
    Quit,
    /// Unknown command.
    Unknown(String),
}

/// Command router for parsing user input.
pub struct CommandRouter;

impl CommandRouter {
    /// Parses a raw input line into a Command.
    ///
    /// Returns `Ok(None)` for empty or whitespace-only input.
    pub fn parse(input: &str) -> Result<Option<Command>> {
        let tokens = tokenize(input)?;
        match tokens.split_first() {
            None => Ok(None),
            Some((name, args)) => Self::route(name, args).map(Some),
        }
    }

    /// Maps a command name and its arguments onto a Command.
    pub fn route(name: &str, args: &[String]) -> Result<Command> {
        let Some(def) = find_command(name) else {
            return Ok(Command::Unknown(name.to_lowercase()));
        };

        let kind = def.kind;
        let command = match kind {
            CommandKind::Help => Command::Help,
            CommandKind::Tables => Command::Tables,
            CommandKind::Backup => Command::Backup,
            CommandKind::Info => Command::Info,
            CommandKind::Clear => Command::Clear,
            CommandKind::Quit => Command::Quit,
            CommandKind::Use => Command::Use(Self::exactly_one(kind, args)?),
            CommandKind::Drop => Command::Drop(Self::exactly_one(kind, args)?),
            CommandKind::Restore => Command::Restore(Self::exactly_one(kind, args)?),
            CommandKind::Schema => Command::Schema(Self::at_most_one(kind, args)?),
            CommandKind::Count => Command::Count(Self::at_most_one(kind, args)?),
            CommandKind::Select => Command::Select(Self::parse_select_args(args)?),
            CommandKind::Insert => {
                if args.is_empty() {
                    return Err(Self::usage_error(kind));
                }
                Command::Insert(Assignments::parse(args)?)
            }
            CommandKind::Update => Command::Update(Self::parse_update_args(args)?),
            CommandKind::Delete => Command::Delete(Self::parse_delete_args(args)?),
            CommandKind::Sql => Command::Sql(Self::rest(kind, args)?),
            CommandKind::Search => Command::Search(Self::rest(kind, args)?),
            CommandKind::Export => Command::Export(Self::parse_export_args(args)?),
            CommandKind::Import => Command::Import(Self::parse_import_args(args)?),
            CommandKind::Create => Command::Create(Self::parse_create_args(args)?),
        };

        Ok(command)
    }

    fn usage_error(kind: CommandKind) -> ShellError {
        ShellError::usage(usage(kind))
    }

    fn exactly_one(kind: CommandKind, args: &[String]) -> Result<String> {
        match args {
            [only] => Ok(only.clone()),
            _ => Err(Self::usage_error(kind)),
        }
    }

    fn at_most_one(kind: CommandKind, args: &[String]) -> Result<Option<String>> {
        match args {
            [] => Ok(None),
            [only] => Ok(Some(only.clone())),
            _ => Err(Self::usage_error(kind)),
        }
    }

    /// Rejoins all arguments with single spaces; at least one is required.
    fn rest(kind: CommandKind, args: &[String]) -> Result<String> {
        if args.is_empty() {
            return Err(Self::usage_error(kind));
        }
        Ok(args.join(" "))
    }

    /// Parse `select [table] [limit N]`.
    fn parse_select_args(args: &[String]) -> Result<SelectArgs> {
        let is_limit = |s: &String| s.eq_ignore_ascii_case("limit");

        let (table, rest) = match args.split_first() {
            Some((first, rest)) if !is_limit(first) => (Some(first.clone()), rest),
            _ => (None, args),
        };

        let limit = match rest {
            [] => None,
            [keyword, n] if is_limit(keyword) => Some(
                n.parse::<u64>()
                    .map_err(|_| Self::usage_error(CommandKind::Select))?,
            ),
            _ => return Err(Self::usage_error(CommandKind::Select)),
        };

        Ok(SelectArgs { table, limit })
    }

    /// Parse `update id=<rowid> key=value ...`.
    fn parse_update_args(args: &[String]) -> Result<UpdateArgs> {
        let all = Assignments::parse(args)?;

        let id = match all.get("id") {
            Some(id) if !id.is_empty() => RowId(id.to_string()),
            _ => return Err(Self::usage_error(CommandKind::Update)),
        };

        let set = Assignments {
            pairs: all
                .pairs
                .into_iter()
                .filter(|(k, _)| !k.eq_ignore_ascii_case("id"))
                .collect(),
        };

        Ok(UpdateArgs { id, set })
    }

    /// Parse `delete id=<rowid>`; nothing else is accepted.
    fn parse_delete_args(args: &[String]) -> Result<RowId> {
        match args {
            [only] => match split_pair(only) {
                Ok((key, value)) if key.eq_ignore_ascii_case("id") && !value.is_empty() => {
                    Ok(RowId(value.to_string()))
                }
                _ => Err(Self::usage_error(CommandKind::Delete)),
            },
            _ => Err(Self::usage_error(CommandKind::Delete)),
        }
    }

    /// Parse `export (csv|json) <path> [table]`.
    fn parse_export_args(args: &[String]) -> Result<ExportArgs> {
        let usage_error = || Self::usage_error(CommandKind::Export);
        match args {
            [format, path] | [format, path, _] => Ok(ExportArgs {
                format: DataFormat::parse(format).ok_or_else(usage_error)?,
                path: path.clone(),
                table: args.get(2).cloned(),
            }),
            _ => Err(usage_error()),
        }
    }

    /// Parse `import (csv|json) <path> <table>`.
    fn parse_import_args(args: &[String]) -> Result<ImportArgs> {
        let usage_error = || Self::usage_error(CommandKind::Import);
        match args {
            [format, path, table] => Ok(ImportArgs {
                format: DataFormat::parse(format).ok_or_else(usage_error)?,
                path: path.clone(),
                table: table.clone(),
            }),
            _ => Err(usage_error()),
        }
    }

    /// Parse `create <table> <column definitions...>`.
    fn parse_create_args(args: &[String]) -> Result<CreateArgs> {
        match args.split_first() {
            Some((table, columns)) if !columns.is_empty() => Ok(CreateArgs {
                table: table.clone(),
                columns: columns.join(" "),
            }),
            _ => Err(Self::usage_error(CommandKind::Create)),
        }
    }
}
