//! System command handlers (help, clear, quit, info, backup, restore).

use std::path::Path;

use tracing::{debug, info, warn};

use super::{count_rows, CommandContext};
use crate::commands::definitions::generate_help_text;
use crate::commands::output::CommandOutput;
use crate::error::{Result, ShellError};

/// Handle help command.
pub fn handle_help() -> CommandOutput {
    CommandOutput::info(generate_help_text())
}

/// Handle clear command.
pub fn handle_clear() -> CommandOutput {
    CommandOutput::clear_transcript()
}

/// Handle quit or exit command.
pub fn handle_quit() -> CommandOutput {
    CommandOutput::exit()
}

/// Handle unknown command.
pub fn handle_unknown(command: &str) -> CommandOutput {
    debug!(command, "Unknown command");
    CommandOutput::info("Unknown command.")
}

/// Handle info command.
pub async fn handle_info(ctx: &CommandContext<'_>) -> Result<CommandOutput> {
    let mut lines = vec!["Database Information:".to_string()];

    match ctx.storage.location() {
        Some(path) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let bytes = tokio::fs::metadata(path).await?.len();

            lines.push(format!("Database: {name}"));
            lines.push(format!("Location: {}", path.display()));
            lines.push(format!("Size: {:.2} KB", bytes as f64 / 1024.0));
        }
        None => lines.push("Database: (in memory)".to_string()),
    }

    let tables = ctx.storage.list_tables().await?;
    let mut total = 0;
    let mut per_table = Vec::with_capacity(tables.len());
    for table in &tables {
        let count = count_rows(ctx.storage, table).await?;
        total += count;
        per_table.push(format!("  • {table}: {count} records"));
    }

    lines.push(format!("Tables: {}", tables.len()));
    lines.push(format!("Total Records: {total}"));
    if !per_table.is_empty() {
        lines.push(String::new());
        lines.push("Tables:".to_string());
        lines.extend(per_table);
    }

    Ok(CommandOutput::info(lines.join("\n")))
}

/// Handle backup command.
pub async fn handle_backup(ctx: &CommandContext<'_>) -> Result<CommandOutput> {
    let receipt = ctx.backup.backup().await?;
    info!("Backup created: {}", receipt.path.display());
    Ok(CommandOutput::info(format!("Backup created: {}", receipt.name)))
}

/// Handle restore command.
///
/// The store is closed around the copy and reopened whether or not the copy
/// succeeded. A current table missing from the restored database is cleared.
pub async fn handle_restore(ctx: &mut CommandContext<'_>, source: &str) -> Result<CommandOutput> {
    if ctx.storage.location().is_none() {
        return Err(ShellError::validation(
            "Failed to restore database: database is not file-backed",
        ));
    }

    ctx.storage.close().await?;
    let restored = ctx.backup.restore(Path::new(source)).await;
    ctx.storage.reopen().await?;
    let receipt = restored?;

    if let Some(current) = ctx.session.current_table().map(str::to_string) {
        if ctx.storage.find_table(&current).await?.is_none() {
            warn!("Current table {current} is gone after restore");
            ctx.session.clear_current_table();
        }
    }
    ctx.view.refresh_table_list();
    ctx.reload_current();

    info!("Database restored from {}", receipt.path.display());
    Ok(CommandOutput::info(format!(
        "Database restored from {}.",
        receipt.name
    )))
}
