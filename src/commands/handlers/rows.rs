//! Row-level handlers (select, insert, update, delete, search).

use super::CommandContext;
use crate::commands::definitions::CommandKind;
use crate::commands::output::CommandOutput;
use crate::commands::router::{Assignments, RowId, SelectArgs, UpdateArgs};
use crate::db::Value;
use crate::error::Result;
use crate::safety;

/// Handle select command.
pub async fn handle_select(ctx: &CommandContext<'_>, args: &SelectArgs) -> Result<CommandOutput> {
    let table = ctx.table_or_current(args.table.as_deref(), CommandKind::Select)?;
    let mut sql = format!("SELECT * FROM {}", safety::quote_table(&table)?);
    if let Some(limit) = args.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    let result = ctx.storage.execute(&sql, &[]).await?.into_result();
    Ok(CommandOutput::from_result(&result))
}

/// Handle insert command.
pub async fn handle_insert(ctx: &CommandContext<'_>, pairs: &Assignments) -> Result<CommandOutput> {
    let table = ctx.require_table()?;
    let quoted = safety::quote_table(&table)?;

    let columns = pairs
        .columns()
        .map(safety::quote_column)
        .collect::<Result<Vec<_>>>()?;
    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {quoted} ({}) VALUES ({placeholders})",
        columns.join(", ")
    );

    ctx.storage.execute(&sql, &pairs.values()).await?;
    ctx.storage.commit().await?;
    ctx.view.reload_current_table(&table);

    Ok(CommandOutput::info("Inserted 1 row."))
}

/// Handle update command.
///
/// With no columns to set nothing is sent to storage.
pub async fn handle_update(ctx: &CommandContext<'_>, args: &UpdateArgs) -> Result<CommandOutput> {
    let table = ctx.require_table()?;
    let quoted = safety::quote_table(&table)?;

    if args.set.is_empty() {
        return Ok(CommandOutput::info("Updated 0 row(s)."));
    }

    let set_clause = args
        .set
        .columns()
        .map(|col| safety::quote_column(col).map(|q| format!("{q} = ?")))
        .collect::<Result<Vec<_>>>()?
        .join(", ");
    let sql = format!("UPDATE {quoted} SET {set_clause} WHERE rowid = ?");

    let mut params = args.set.values();
    params.push(args.id.to_value());

    let outcome = ctx.storage.execute(&sql, &params).await?;
    ctx.storage.commit().await?;
    ctx.view.reload_current_table(&table);

    Ok(CommandOutput::info(format!(
        "Updated {} row(s).",
        outcome.rows_affected
    )))
}

/// Handle delete command.
pub async fn handle_delete(ctx: &CommandContext<'_>, id: &RowId) -> Result<CommandOutput> {
    let table = ctx.require_table()?;
    let sql = format!(
        "DELETE FROM {} WHERE rowid = ?",
        safety::quote_table(&table)?
    );

    let outcome = ctx.storage.execute(&sql, &[id.to_value()]).await?;
    ctx.storage.commit().await?;
    ctx.view.reload_current_table(&table);

    Ok(CommandOutput::info(format!(
        "Deleted {} row(s).",
        outcome.rows_affected
    )))
}

/// Handle search command.
///
/// Shows the current table with its rowid, keeping rows whose values joined
/// by spaces contain the term, ignoring case.
pub async fn handle_search(ctx: &CommandContext<'_>, term: &str) -> Result<CommandOutput> {
    let table = ctx.require_table()?;
    let sql = format!("SELECT rowid, * FROM {}", safety::quote_table(&table)?);
    let mut result = ctx.storage.execute(&sql, &[]).await?.into_result();

    let needle = term.to_lowercase();
    result.rows.retain(|row| row_text(row).contains(&needle));

    Ok(CommandOutput::from_result(&result))
}

fn row_text(row: &[Value]) -> String {
    row.iter()
        .map(|v| v.to_display_string().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
