//! Storage abstraction for portable-db.
//!
//! Handlers talk to the relational engine only through the `Storage` trait.
//! `SqliteStore` is the SQLite implementation used by the binary and tests.

mod sqlite;
mod types;

pub use sqlite::SqliteStore;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Outcome of executing one statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecOutcome {
    /// Rows changed by an INSERT, UPDATE or DELETE, with or without
    /// RETURNING. Zero for other statements.
    pub rows_affected: u64,

    /// Result set, present when the statement produces columns.
    pub result: Option<QueryResult>,
}

impl ExecOutcome {
    /// Returns the result set, or an empty one for statements without columns.
    pub fn into_result(self) -> QueryResult {
        self.result.unwrap_or_default()
    }
}

/// Trait defining the interface to the relational engine.
///
/// All operations are async and return Results with ShellError.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Lists user tables in ascending name order.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Returns a table's columns and declared types in storage order.
    ///
    /// An unknown table yields an empty list.
    async fn table_info(&self, table: &str) -> Result<Vec<ColumnInfo>>;

    /// Executes one statement with positional parameters.
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecOutcome>;

    /// Makes previous writes durable, ending any transaction raw SQL opened.
    async fn commit(&self) -> Result<()>;

    /// Path of the database file, if the store is file-backed.
    fn location(&self) -> Option<&Path>;

    /// Closes the underlying connection.
    async fn close(&self) -> Result<()>;

    /// Connects again to the same database after `close`, picking up a file
    /// that was replaced in the meantime.
    async fn reopen(&self) -> Result<()>;

    /// Resolves a table name, ignoring ASCII case, to its stored spelling.
    async fn find_table(&self, table: &str) -> Result<Option<String>> {
        Ok(self
            .list_tables()
            .await?
            .into_iter()
            .find(|t| t.eq_ignore_ascii_case(table)))
    }
}
