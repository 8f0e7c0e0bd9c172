//! SQLite storage implementation.
//!
//! Provides the `SqliteStore` struct that implements the `Storage` trait using
//! sqlx. The pool holds exactly one long-lived connection so an in-memory
//! database survives between statements and writes are strictly sequential.

use crate::db::{ColumnInfo, ExecOutcome, QueryResult, Row, Storage, Value};
use crate::error::{Result, ShellError};
use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{
    Sqlite, SqliteArguments, SqliteConnectOptions, SqliteConnection, SqliteJournalMode,
    SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Column as _, Executor as _, Row as _, Statement as _, TypeInfo as _, ValueRef as _};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, info};

/// How long to wait for a locked database file before giving up.
const BUSY_TIMEOUT_SECS: u64 = 5;

/// How long to wait for the single pooled connection.
const ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// SQLite's message for COMMIT outside a transaction.
const NO_ACTIVE_TRANSACTION: &str = "no transaction is active";

/// SQLite-backed storage.
#[derive(Debug)]
pub struct SqliteStore {
    pool: RwLock<SqlitePool>,
    options: SqliteConnectOptions,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Opens or creates the database file at the given path.
    ///
    /// Uses the rollback journal so the database is always a single file that
    /// a plain copy can back up.
    pub async fn open(path: &Path) -> Result<Self> {
        Self::ensure_parent_dirs(path)?;

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete)
            .busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS));

        let pool = Self::connect(options.clone())
            .await
            .map_err(|e| Self::open_error(path, &e))?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            pool: RwLock::new(pool),
            options,
            path: Some(path.to_path_buf()),
        })
    }

    /// Opens a private in-memory database.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = Self::connect(options.clone()).await?;
        debug!("In-memory database opened");
        Ok(Self {
            pool: RwLock::new(pool),
            options,
            path: None,
        })
    }

    /// Creates a single-connection pool that never recycles its connection.
    async fn connect(options: SqliteConnectOptions) -> std::result::Result<SqlitePool, sqlx::Error> {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
            .connect_with(options)
            .await
    }

    fn open_error(path: &Path, err: &sqlx::Error) -> ShellError {
        ShellError::storage(format!(
            "Failed to open database {}: {}",
            path.display(),
            crate::error::format_storage_error(err)
        ))
    }

    /// Returns a handle to the current pool.
    fn pool(&self) -> Result<SqlitePool> {
        self.pool
            .read()
            .map(|pool| pool.clone())
            .map_err(|_| ShellError::internal("Storage lock poisoned"))
    }

    /// Ensures parent directories exist for the database path.
    fn ensure_parent_dirs(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ShellError::io(format!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for SqliteStore {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let names: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )
        .fetch_all(&self.pool()?)
        .await?;

        Ok(names.into_iter().map(|(name,)| name).collect())
    }

    async fn table_info(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let columns: Vec<(String, String)> =
            sqlx::query_as("SELECT name, type FROM pragma_table_info(?) ORDER BY cid")
                .bind(table)
                .fetch_all(&self.pool()?)
                .await?;

        Ok(columns
            .into_iter()
            .map(|(name, data_type)| ColumnInfo::new(name, data_type))
            .collect())
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecOutcome> {
        debug!(sql, params = params.len(), "Executing statement");

        // Every step below must see the same connection's change counters.
        let mut conn = self.pool()?.acquire().await?;

        // Preparing first tells us the result columns even when no rows come back.
        let statement = (&mut *conn).prepare(sql).await?;
        let columns: Vec<ColumnInfo> = statement
            .columns()
            .iter()
            .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
            .collect();

        let query = bind_all(sqlx::query(sql), params);

        if columns.is_empty() {
            let done = query.execute(&mut *conn).await?;
            debug!(rows_affected = done.rows_affected(), "Statement executed");
            return Ok(ExecOutcome {
                rows_affected: done.rows_affected(),
                result: None,
            });
        }

        // A write with RETURNING also yields rows. changes() only describes the
        // last write, so it is read only when this statement moved the total.
        let total_before = scalar(&mut conn, "SELECT total_changes()").await?;
        let rows = query.fetch_all(&mut *conn).await?;
        let rows = rows.iter().map(convert_row).collect::<Result<Vec<_>>>()?;
        let rows_affected = if scalar(&mut conn, "SELECT total_changes()").await? > total_before {
            u64::try_from(scalar(&mut conn, "SELECT changes()").await?).unwrap_or_default()
        } else {
            0
        };
        debug!(rows = rows.len(), rows_affected, "Query returned rows");

        Ok(ExecOutcome {
            rows_affected,
            result: Some(QueryResult::with_data(columns, rows)),
        })
    }

    async fn commit(&self) -> Result<()> {
        // Statements auto-commit unless raw SQL opened a transaction.
        match self.pool()?.execute("COMMIT").await {
            Ok(_) => {
                info!("Open transaction committed");
                Ok(())
            }
            Err(sqlx::Error::Database(e)) if e.message().contains(NO_ACTIVE_TRANSACTION) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn location(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn close(&self) -> Result<()> {
        self.pool()?.close().await;
        Ok(())
    }

    async fn reopen(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Err(ShellError::storage(
                "An in-memory database cannot be reopened",
            ));
        };

        let fresh = Self::connect(self.options.clone())
            .await
            .map_err(|e| Self::open_error(path, &e))?;
        let stale = {
            let mut guard = self
                .pool
                .write()
                .map_err(|_| ShellError::internal("Storage lock poisoned"))?;
            std::mem::replace(&mut *guard, fresh)
        };
        stale.close().await;

        info!("Database reopened at {}", path.display());
        Ok(())
    }
}

/// Runs a single-value integer query on the given connection.
async fn scalar(conn: &mut SqliteConnection, sql: &str) -> Result<i64> {
    let (value,): (i64,) = sqlx::query_as(sql).fetch_one(&mut *conn).await?;
    Ok(value)
}

/// Binds positional parameters in order.
fn bind_all<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &[Value],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            Value::Null => query.bind(None::<String>),
            Value::Int(i) => query.bind(*i),
            Value::Float(f) => query.bind(*f),
            Value::String(s) => query.bind(s.clone()),
            Value::Bytes(b) => query.bind(b.clone()),
        };
    }
    query
}

/// Converts a SQLite row to our Row type.
fn convert_row(row: &SqliteRow) -> Result<Row> {
    (0..row.len()).map(|i| convert_value(row, i)).collect()
}

/// Converts a single value by its storage class rather than the declared type.
fn convert_value(row: &SqliteRow, index: usize) -> Result<Value> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage_class = raw.type_info().name().to_string();

    let value = match storage_class.as_str() {
        "INTEGER" => Value::Int(row.try_get_unchecked::<i64, _>(index)?),
        "REAL" => Value::Float(row.try_get_unchecked::<f64, _>(index)?),
        "BLOB" => Value::Bytes(row.try_get_unchecked::<Vec<u8>, _>(index)?),
        _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
    };
    Ok(value)
}
