//! Table-level handlers (tables, use, schema, create, drop, count).

use tracing::info;

use super::{count_rows, CommandContext};
use crate::commands::definitions::CommandKind;
use crate::commands::output::CommandOutput;
use crate::commands::router::CreateArgs;
use crate::error::{Result, ShellError};
use crate::safety::{self, IdentifierKind};

/// Handle tables command.
pub async fn handle_tables(ctx: &CommandContext<'_>) -> Result<CommandOutput> {
    let tables = ctx.storage.list_tables().await?;
    if tables.is_empty() {
        return Ok(CommandOutput::info("No tables."));
    }
    Ok(CommandOutput::info(tables.join("\n")))
}

/// Handle use command.
///
/// The session is only updated once the table is known to exist.
pub async fn handle_use(ctx: &mut CommandContext<'_>, table: &str) -> Result<CommandOutput> {
    safety::validate_identifier(table, IdentifierKind::Table)?;

    let name = ctx
        .storage
        .find_table(table)
        .await?
        .ok_or_else(|| ShellError::table_not_found(table))?;

    ctx.session.set_current_table(name.clone());
    ctx.view.reload_current_table(&name);

    Ok(CommandOutput::info(format!("Using table '{name}'.")))
}

/// Handle schema command.
pub async fn handle_schema(ctx: &CommandContext<'_>, table: Option<&str>) -> Result<CommandOutput> {
    let table = ctx.table_or_current(table, CommandKind::Schema)?;
    safety::validate_identifier(&table, IdentifierKind::Table)?;

    let columns = ctx.storage.table_info(&table).await?;
    if columns.is_empty() {
        return Err(ShellError::table_not_found(&table));
    }

    let rows = columns
        .into_iter()
        .map(|col| vec![col.name, col.data_type])
        .collect();
    Ok(CommandOutput::table(
        vec!["column".to_string(), "type".to_string()],
        rows,
    ))
}

/// Handle create command.
pub async fn handle_create(ctx: &CommandContext<'_>, args: &CreateArgs) -> Result<CommandOutput> {
    let table = safety::quote_table(&args.table)?;
    let columns = safety::column_definitions(&args.columns)?;
    let sql = format!("CREATE TABLE {table} ({columns})");

    ctx.storage.execute(&sql, &[]).await?;
    ctx.storage.commit().await?;
    ctx.view.refresh_table_list();

    info!("Created table {}", args.table);
    Ok(CommandOutput::info(format!("Table '{}' created.", args.table)))
}

/// Handle drop command. Clears the session if the dropped table was current.
pub async fn handle_drop(ctx: &mut CommandContext<'_>, table: &str) -> Result<CommandOutput> {
    let quoted = safety::quote_table(table)?;
    let name = ctx
        .storage
        .find_table(table)
        .await?
        .ok_or_else(|| ShellError::table_not_found(table))?;

    ctx.storage
        .execute(&format!("DROP TABLE {quoted}"), &[])
        .await?;
    ctx.storage.commit().await?;

    if ctx
        .session
        .current_table()
        .is_some_and(|current| current.eq_ignore_ascii_case(&name))
    {
        ctx.session.clear_current_table();
    }
    ctx.view.refresh_table_list();

    info!("Dropped table {name}");
    Ok(CommandOutput::info(format!("Table '{name}' dropped.")))
}

/// Handle count command.
pub async fn handle_count(ctx: &CommandContext<'_>, table: Option<&str>) -> Result<CommandOutput> {
    let table = ctx.table_or_current(table, CommandKind::Count)?;
    safety::validate_identifier(&table, IdentifierKind::Table)?;

    let count = count_rows(ctx.storage, &table).await?;
    Ok(CommandOutput::info(format!("{table}: {count} record(s)")))
}
