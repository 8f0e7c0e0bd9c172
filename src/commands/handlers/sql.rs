//! Raw SQL handler.

use tracing::debug;

use super::CommandContext;
use crate::commands::output::CommandOutput;
use crate::error::Result;
use crate::safety::{self, StatementKind};

/// Handle sql command.
///
/// The text goes to storage verbatim. Anything that is not a SELECT is
/// committed and always refreshes the view, even when no rows changed.
pub async fn handle_sql(ctx: &CommandContext<'_>, sql: &str) -> Result<CommandOutput> {
    let kind = safety::classify(sql);
    debug!(?kind, sql, "Executing raw SQL");

    let outcome = ctx.storage.execute(sql, &[]).await?;

    match kind {
        StatementKind::Query => Ok(CommandOutput::from_result(&outcome.into_result())),
        StatementKind::Change => {
            ctx.storage.commit().await?;
            ctx.view.refresh_table_list();
            ctx.reload_current();
            Ok(CommandOutput::info(format!(
                "Query OK, {} row(s) affected.",
                outcome.rows_affected
            )))
        }
    }
}
