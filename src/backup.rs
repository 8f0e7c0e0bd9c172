//! Database backup collaborator.
//!
//! `FileBackup` copies the database file to `backup_YYYYMMDD_HHMMSS.db` in a
//! backup directory, and copies a chosen backup back over the database file.
//! The database must be in rollback-journal mode with no open transaction,
//! which is how `SqliteStore` runs it. Restoring also needs the store closed
//! for the duration of the copy.

use crate::error::{Result, ShellError};
use async_trait::async_trait;
use chrono::Local;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::info;

/// First bytes of every SQLite 3 database file.
const SQLITE_HEADER: &[u8; 16] = b"SQLite format 3\0";

/// Receipt for a finished backup or restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReceipt {
    /// File name of the backup, without directory.
    pub name: String,
    /// Full path of the backup.
    pub path: PathBuf,
    /// Bytes copied.
    pub bytes: u64,
}

/// Creates backups of the current database and restores them.
#[async_trait]
pub trait BackupService: Send + Sync {
    async fn backup(&self) -> Result<BackupReceipt>;

    /// Replaces the database file with the backup at `source`.
    ///
    /// The caller closes the store before and reopens it after.
    async fn restore(&self, source: &Path) -> Result<BackupReceipt>;
}

/// Copies the database file into a backup directory.
#[derive(Debug, Clone)]
pub struct FileBackup {
    source: PathBuf,
    dir: PathBuf,
}

impl FileBackup {
    /// Creates a backup service for `source`, writing into `dir`.
    pub fn new(source: impl Into<PathBuf>, dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dir: dir.into(),
        }
    }

    /// Backup file name for the current local time.
    pub fn backup_name() -> String {
        format!("backup_{}.db", Local::now().format("%Y%m%d_%H%M%S"))
    }

    /// Resolves a restore argument. A bare name that does not exist as given
    /// is looked up in the backup directory, so `backup`'s reported name works.
    fn resolve(&self, source: &Path) -> PathBuf {
        if source.is_relative() && !source.exists() {
            let in_dir = self.dir.join(source);
            if in_dir.exists() {
                return in_dir;
            }
        }
        source.to_path_buf()
    }

    fn journal_path(&self) -> PathBuf {
        let mut journal = OsString::from(self.source.as_os_str());
        journal.push("-journal");
        PathBuf::from(journal)
    }
}

/// Checks that a file starts with the SQLite header.
async fn check_sqlite_file(path: &Path) -> Result<()> {
    let mut file = tokio::fs::File::open(path).await.map_err(|e| {
        ShellError::io(format!(
            "Failed to restore database: {}: {e}",
            path.display()
        ))
    })?;

    let mut header = [0u8; 16];
    match file.read_exact(&mut header).await {
        Ok(_) if &header == SQLITE_HEADER => Ok(()),
        _ => Err(ShellError::validation(format!(
            "'{}' is not a SQLite database",
            path.display()
        ))),
    }
}

/// True when both paths name the same existing file.
fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[async_trait]
impl BackupService for FileBackup {
    async fn backup(&self) -> Result<BackupReceipt> {
        let name = Self::backup_name();
        let path = self.dir.join(&name);

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            ShellError::io(format!(
                "Failed to create backup directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let bytes = tokio::fs::copy(&self.source, &path)
            .await
            .map_err(|e| ShellError::io(format!("Failed to create backup: {e}")))?;

        info!("Backup written to {} ({} bytes)", path.display(), bytes);
        Ok(BackupReceipt { name, path, bytes })
    }

    async fn restore(&self, source: &Path) -> Result<BackupReceipt> {
        let path = self.resolve(source);
        check_sqlite_file(&path).await?;
        if same_file(&path, &self.source) {
            return Err(ShellError::validation(
                "Cannot restore the database from itself",
            ));
        }

        // A leftover hot journal would be replayed into the restored file.
        match tokio::fs::remove_file(self.journal_path()).await {
            Ok(()) => info!("Removed stale journal before restore"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ShellError::io(format!(
                    "Failed to restore database: {e}"
                )))
            }
        }

        let bytes = tokio::fs::copy(&path, &self.source)
            .await
            .map_err(|e| ShellError::io(format!("Failed to restore database: {e}")))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!(
            "Database {} restored from {} ({} bytes)",
            self.source.display(),
            path.display(),
            bytes
        );
        Ok(BackupReceipt { name, path, bytes })
    }
}

/// A backup service for stores without a file, such as in-memory databases.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBackup;

#[async_trait]
impl BackupService for NoBackup {
    async fn backup(&self) -> Result<BackupReceipt> {
        Err(ShellError::io(
            "Failed to create backup: database is not file-backed",
        ))
    }

    async fn restore(&self, _source: &Path) -> Result<BackupReceipt> {
        Err(ShellError::io(
            "Failed to restore database: database is not file-backed",
        ))
    }
}
