//! Command handlers for portable-db.
//!
//! Each handler takes a command context plus its parsed arguments and returns
//! a `CommandOutput`. Failures are returned as `ShellError` and rendered by
//! the shell, so handlers never write to the transcript themselves.

pub mod rows;
pub mod sql;
pub mod system;
pub mod tables;
pub mod transfer;

use tracing::debug;

use super::definitions::{usage, CommandKind};
use super::output::CommandOutput;
use super::router::Command;
use crate::backup::BackupService;
use crate::db::{Storage, Value};
use crate::error::{Result, ShellError};
use crate::safety;
use crate::shell::Session;
use crate::view::ViewHooks;

/// Context provided to command handlers.
pub struct CommandContext<'a> {
    /// Relational engine.
    pub storage: &'a dyn Storage,
    /// Shell-local state, mutated by `use`, `drop` and `restore`.
    pub session: &'a mut Session,
    /// Host view to notify after data changes.
    pub view: &'a dyn ViewHooks,
    /// Backup collaborator.
    pub backup: &'a dyn BackupService,
}

impl CommandContext<'_> {
    /// Returns the current table, or the standard error when none is selected.
    pub fn require_table(&self) -> Result<String> {
        self.session
            .current_table()
            .map(str::to_string)
            .ok_or_else(|| ShellError::validation("Select a table first."))
    }

    /// Returns the explicit table argument, falling back to the current table.
    ///
    /// With neither, the command's usage line is the error.
    pub fn table_or_current(&self, table: Option<&str>, kind: CommandKind) -> Result<String> {
        table
            .or_else(|| self.session.current_table())
            .map(str::to_string)
            .ok_or_else(|| ShellError::usage(usage(kind)))
    }

    /// Asks the view to reload the current table, if there is one.
    pub fn reload_current(&self) {
        if let Some(table) = self.session.current_table() {
            self.view.reload_current_table(table);
        }
    }
}

/// Runs a parsed command against the context.
pub async fn execute(command: &Command, ctx: &mut CommandContext<'_>) -> Result<CommandOutput> {
    debug!(?command, "Dispatching command");

    match command {
        Command::Help => Ok(system::handle_help()),
        Command::Clear => Ok(system::handle_clear()),
        Command::Quit => Ok(system::handle_quit()),
        Command::Unknown(name) => Ok(system::handle_unknown(name)),
        Command::Info => system::handle_info(ctx).await,
        Command::Backup => system::handle_backup(ctx).await,
        Command::Restore(path) => system::handle_restore(ctx, path).await,
        Command::Tables => tables::handle_tables(ctx).await,
        Command::Use(table) => tables::handle_use(ctx, table).await,
        Command::Schema(table) => tables::handle_schema(ctx, table.as_deref()).await,
        Command::Create(args) => tables::handle_create(ctx, args).await,
        Command::Drop(table) => tables::handle_drop(ctx, table).await,
        Command::Count(table) => tables::handle_count(ctx, table.as_deref()).await,
        Command::Select(args) => rows::handle_select(ctx, args).await,
        Command::Insert(pairs) => rows::handle_insert(ctx, pairs).await,
        Command::Update(args) => rows::handle_update(ctx, args).await,
        Command::Delete(id) => rows::handle_delete(ctx, id).await,
        Command::Search(term) => rows::handle_search(ctx, term).await,
        Command::Sql(query) => sql::handle_sql(ctx, query).await,
        Command::Export(args) => transfer::handle_export(ctx, args).await,
        Command::Import(args) => transfer::handle_import(ctx, args).await,
    }
}

/// Counts the rows of a table that is already known to exist.
pub(crate) async fn count_rows(storage: &dyn Storage, table: &str) -> Result<u64> {
    let sql = format!("SELECT COUNT(*) FROM {}", safety::quote_stored(table));
    let result = storage.execute(&sql, &[]).await?.into_result();

    match result.rows.first().and_then(|row| row.first()) {
        Some(Value::Int(n)) => Ok(u64::try_from(*n).unwrap_or_default()),
        other => Err(ShellError::internal(format!(
            "Unexpected COUNT(*) result: {other:?}"
        ))),
    }
}
