//! Identifier checks and statement classification.
//!
//! Table and column names are spliced into constructed SQL, so every name a
//! handler uses goes through `validate_identifier` first. In `create` column
//! definitions only the names are checked; type and constraint text is kept
//! as written. Raw `sql` text is never checked; it is only classified.

use crate::error::{Result, ShellError};
use std::fmt;

/// Longest accepted identifier.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// What an identifier names, for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Table,
    Column,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Column => write!(f, "column"),
        }
    }
}

/// Checks a name against `^[A-Za-z_][A-Za-z0-9_]{0,63}$`.
pub fn validate_identifier(name: &str, kind: IdentifierKind) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_start && valid_rest && name.len() <= MAX_IDENTIFIER_LEN {
        Ok(())
    } else {
        Err(ShellError::validation(format!(
            "Invalid {kind} name '{name}': use letters, digits and underscores, \
             starting with a letter or underscore (max {MAX_IDENTIFIER_LEN})"
        )))
    }
}

/// Validates a table name and returns it double-quoted for SQL.
pub fn quote_table(name: &str) -> Result<String> {
    validate_identifier(name, IdentifierKind::Table)?;
    Ok(format!("\"{name}\""))
}

/// Validates a column name and returns it double-quoted for SQL.
pub fn quote_column(name: &str) -> Result<String> {
    validate_identifier(name, IdentifierKind::Column)?;
    Ok(format!("\"{name}\""))
}

/// Quotes a name read back from the engine's catalog, doubling embedded quotes.
///
/// Only for names the engine itself reported, such as `list_tables` output.
pub fn quote_stored(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Leading keywords of table constraints allowed among column definitions.
const TABLE_CONSTRAINTS: &[&str] = &["CONSTRAINT", "PRIMARY", "UNIQUE", "CHECK", "FOREIGN"];

/// Rewrites `name TYPE [constraints], ...` with each column name validated
/// and quoted. Commas inside parentheses, as in `DECIMAL(10, 2)`, do not
/// split definitions.
pub fn column_definitions(defs: &str) -> Result<String> {
    if defs.contains(';') {
        return Err(ShellError::validation(
            "Column definitions cannot contain ';'",
        ));
    }

    let defs = split_top_level(defs)
        .into_iter()
        .map(|def| {
            let def = def.trim();
            let (name, rest) = def.split_once(char::is_whitespace).unwrap_or((def, ""));
            if name.is_empty() {
                return Err(ShellError::validation("Empty column definition"));
            }
            if TABLE_CONSTRAINTS.iter().any(|k| name.eq_ignore_ascii_case(k)) {
                return Ok(def.to_string());
            }

            let quoted = quote_column(name)?;
            Ok(match rest.trim() {
                "" => quoted,
                rest => format!("{quoted} {rest}"),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(defs.join(", "))
}

/// Splits on commas outside parentheses.
fn split_top_level(defs: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in defs.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&defs[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&defs[start..]);
    parts
}

/// Broad kind of a raw SQL statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Starts with SELECT; its rows are shown.
    Query,
    /// Anything else; committed and reported as a row count.
    Change,
}

/// Classifies raw SQL by whether its trimmed text starts with `SELECT`.
pub fn classify(sql: &str) -> StatementKind {
    let head = sql.trim_start().get(..6).unwrap_or_default();
    if head.eq_ignore_ascii_case("select") {
        StatementKind::Query
    } else {
        StatementKind::Change
    }
}
