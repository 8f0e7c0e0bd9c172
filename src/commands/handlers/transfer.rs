//! Import and export handlers for CSV and JSON files.
//!
//! Files are read and written whole. Imported values are always stored as
//! text; exported JSON keeps the engine's native types.

use serde_json::{Map, Value as JsonValue};
use tracing::info;

use super::CommandContext;
use crate::commands::output::CommandOutput;
use crate::commands::router::{DataFormat, ExportArgs, ImportArgs};
use crate::db::{QueryResult, Value};
use crate::error::{Result, ShellError};
use crate::safety;

/// Rows parsed from an import file, ready for insertion.
#[derive(Debug, Clone, PartialEq)]
struct ImportData {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// Handle export command.
pub async fn handle_export(ctx: &CommandContext<'_>, args: &ExportArgs) -> Result<CommandOutput> {
    let table = args
        .table
        .as_deref()
        .or_else(|| ctx.session.current_table())
        .map(str::to_string)
        .ok_or_else(|| ShellError::validation("Specify a table."))?;

    let sql = format!("SELECT * FROM {}", safety::quote_table(&table)?);
    let result = ctx.storage.execute(&sql, &[]).await?.into_result();

    let contents = match args.format {
        DataFormat::Csv => to_csv(&result)?,
        DataFormat::Json => to_json(&result)?,
    };
    tokio::fs::write(&args.path, contents)
        .await
        .map_err(|e| ShellError::io(format!("Failed to write {}: {e}", args.path)))?;

    info!(
        "Exported {} rows from {} to {} as {}",
        result.row_count(),
        table,
        args.path,
        args.format.as_str()
    );
    Ok(CommandOutput::info(format!(
        "Exported {} row(s) to {}.",
        result.row_count(),
        args.path
    )))
}

/// Handle import command.
///
/// The table is created with all-TEXT columns when it does not exist yet.
pub async fn handle_import(ctx: &CommandContext<'_>, args: &ImportArgs) -> Result<CommandOutput> {
    let quoted = safety::quote_table(&args.table)?;

    let bytes = tokio::fs::read(&args.path)
        .await
        .map_err(|e| ShellError::io(format!("Failed to read {}: {e}", args.path)))?;
    let data = match args.format {
        DataFormat::Csv => parse_csv(&bytes)?,
        DataFormat::Json => parse_json(&bytes)?,
    };

    let columns = data
        .columns
        .iter()
        .map(|c| safety::quote_column(c))
        .collect::<Result<Vec<_>>>()?;

    let definitions = columns
        .iter()
        .map(|c| format!("{c} TEXT"))
        .collect::<Vec<_>>()
        .join(", ");
    ctx.storage
        .execute(
            &format!("CREATE TABLE IF NOT EXISTS {quoted} ({definitions})"),
            &[],
        )
        .await?;

    let insert = format!(
        "INSERT INTO {quoted} ({}) VALUES ({})",
        columns.join(", "),
        vec!["?"; columns.len()].join(", ")
    );
    for row in &data.rows {
        ctx.storage.execute(&insert, row).await?;
    }
    ctx.storage.commit().await?;

    ctx.view.refresh_table_list();
    if ctx
        .session
        .current_table()
        .is_some_and(|current| current.eq_ignore_ascii_case(&args.table))
    {
        ctx.view.reload_current_table(&args.table);
    }

    info!(
        "Imported {} rows from {} into {}",
        data.rows.len(),
        args.path,
        args.table
    );
    Ok(CommandOutput::info(format!(
        "Imported {} row(s) into '{}'.",
        data.rows.len(),
        args.table
    )))
}

/// Writes a header line and one record per row.
fn to_csv(result: &QueryResult) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(result.column_names())?;
    for row in &result.rows {
        writer.write_record(row.iter().map(Value::to_csv_field))?;
    }
    writer
        .into_inner()
        .map_err(|e| ShellError::io(format!("CSV error: {}", e.error())))
}

/// Writes an array of objects keyed by column name, in column order.
fn to_json(result: &QueryResult) -> Result<Vec<u8>> {
    let names = result.column_names();
    let records: Vec<JsonValue> = result
        .rows
        .iter()
        .map(|row| {
            let object: Map<String, JsonValue> = names
                .iter()
                .cloned()
                .zip(row.iter().map(Value::to_json))
                .collect();
            JsonValue::Object(object)
        })
        .collect();

    let mut text = serde_json::to_string_pretty(&records)?;
    text.push('\n');
    Ok(text.into_bytes())
}

/// Parses CSV with a mandatory header row. Short records are padded with NULL.
fn parse_csv(bytes: &[u8]) -> Result<ImportData> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
        return Err(ShellError::validation("CSV has no header"));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = (0..columns.len())
            .map(|i| record.get(i).map(Value::from).unwrap_or(Value::Null))
            .collect();
        rows.push(row);
    }

    Ok(ImportData { columns, rows })
}

/// Parses a non-empty JSON array of flat objects.
///
/// Columns come from the first object. A key missing from a later object
/// becomes an empty string; other keys of later objects are ignored.
fn parse_json(bytes: &[u8]) -> Result<ImportData> {
    let shape_error = || ShellError::validation("JSON must be a non-empty array of objects");

    let parsed: JsonValue = serde_json::from_slice(bytes)?;
    let records = match parsed {
        JsonValue::Array(records) if !records.is_empty() => records,
        _ => return Err(shape_error()),
    };

    let objects = records
        .into_iter()
        .map(|record| match record {
            JsonValue::Object(object) => Ok(object),
            _ => Err(shape_error()),
        })
        .collect::<Result<Vec<_>>>()?;

    let columns: Vec<String> = objects
        .first()
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default();
    if columns.is_empty() {
        return Err(shape_error());
    }

    let rows = objects
        .iter()
        .map(|object| {
            columns
                .iter()
                .map(|col| match object.get(col) {
                    None => Value::String(String::new()),
                    Some(JsonValue::Null) => Value::Null,
                    Some(JsonValue::String(s)) => Value::String(s.clone()),
                    Some(other) => Value::String(other.to_string()),
                })
                .collect()
        })
        .collect();

    Ok(ImportData { columns, rows })
}
