//! Backup, restore and info against a database file.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use portable_db::backup::FileBackup;
use portable_db::db::{SqliteStore, Storage, Value};

use super::{file_shell, run, run_all};

#[tokio::test]
async fn test_backup_creates_openable_copy() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("portable_data.db");
    let backup_dir = dir.path().join("backups");

    let mut shell = file_shell(&db_path)
        .await
        .with_backup(Arc::new(FileBackup::new(&db_path, &backup_dir)));
    run_all(
        &mut shell,
        &["create notes body TEXT", "use notes", "insert body=hello"],
    )
    .await;

    let lines = run(&mut shell, "backup").await;
    assert_eq!(lines.len(), 1);
    let name = lines[0]
        .strip_prefix("Backup created: ")
        .expect("backup message");
    assert!(name.starts_with("backup_") && name.ends_with(".db"));

    let copy = SqliteStore::open(&backup_dir.join(name)).await.unwrap();
    assert_eq!(copy.list_tables().await.unwrap(), vec!["notes"]);
    copy.close().await.unwrap();
}

#[tokio::test]
async fn test_backup_without_service_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut shell = file_shell(&dir.path().join("data.db")).await;

    let lines = run(&mut shell, "backup").await;
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Error: Failed to create backup"));
}

#[tokio::test]
async fn test_info_reports_file_and_size() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("portable_data.db");
    let mut shell = file_shell(&db_path).await;
    run_all(&mut shell, &["create a x TEXT", "create b x TEXT", "use b", "insert x=1"]).await;

    let lines = run(&mut shell, "info").await;
    let bytes = std::fs::metadata(&db_path).unwrap().len();

    assert!(lines.contains(&"Database: portable_data.db".to_string()));
    assert!(lines.contains(&format!("Size: {:.2} KB", bytes as f64 / 1024.0)));
    assert!(lines.contains(&"Tables: 2".to_string()));
    assert!(lines.contains(&"Total Records: 1".to_string()));
    assert!(lines.contains(&"  • a: 0 records".to_string()));
}

#[tokio::test]
async fn test_data_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("portable_data.db");

    {
        let mut shell = file_shell(&db_path).await;
        run_all(&mut shell, &["create t v TEXT", "use t", "insert v=kept"]).await;
        shell.storage().close().await.unwrap();
    }

    let mut shell = file_shell(&db_path).await;
    run_all(&mut shell, &["use t"]).await;
    assert_eq!(run(&mut shell, "select").await, vec!["v", "kept"]);
}

#[tokio::test]
async fn test_write_inside_open_transaction_is_committed() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("portable_data.db");

    let mut shell = file_shell(&db_path).await;
    run_all(&mut shell, &["create t a TEXT", "sql BEGIN", "use t"]).await;
    assert_eq!(run(&mut shell, "insert a=x").await, vec!["Inserted 1 row."]);

    let other = SqliteStore::open(&db_path).await.unwrap();
    let result = other
        .execute("SELECT COUNT(*) FROM t", &[])
        .await
        .unwrap()
        .into_result();
    assert_eq!(result.rows, vec![vec![Value::Int(1)]]);
    other.close().await.unwrap();

    shell.storage().close().await.unwrap();
    let mut reopened = file_shell(&db_path).await;
    assert_eq!(run(&mut reopened, "count t").await, vec!["t: 1 record(s)"]);
}

#[tokio::test]
async fn test_restore_brings_back_backup() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("portable_data.db");
    let backup_dir = dir.path().join("backups");

    let mut shell = file_shell(&db_path)
        .await
        .with_backup(Arc::new(FileBackup::new(&db_path, &backup_dir)));
    run_all(&mut shell, &["create notes body TEXT", "use notes", "insert body=first"]).await;

    let lines = run(&mut shell, "backup").await;
    let name = lines[0]
        .strip_prefix("Backup created: ")
        .expect("backup message")
        .to_string();

    run_all(&mut shell, &["insert body=second", "create scratch a TEXT"]).await;
    assert_eq!(run(&mut shell, "count").await, vec!["notes: 2 record(s)"]);

    assert_eq!(
        run(&mut shell, &format!("restore {name}")).await,
        vec![format!("Database restored from {name}.")]
    );
    assert_eq!(run(&mut shell, "tables").await, vec!["notes"]);
    assert_eq!(shell.session().current_table(), Some("notes"));
    assert_eq!(run(&mut shell, "select").await, vec!["body", "first"]);
}

#[tokio::test]
async fn test_restore_rejects_non_database_and_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("portable_data.db");
    let bogus = dir.path().join("notes.txt");
    std::fs::write(&bogus, "not a database at all").unwrap();

    let mut shell = file_shell(&db_path)
        .await
        .with_backup(Arc::new(FileBackup::new(&db_path, dir.path())));
    run_all(&mut shell, &["create t a TEXT", "use t", "insert a=1"]).await;

    let lines = run(&mut shell, &format!("restore '{}'", bogus.display())).await;
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("is not a SQLite database"), "{lines:?}");
    assert_eq!(run(&mut shell, "count").await, vec!["t: 1 record(s)"]);
    assert_eq!(run(&mut shell, "restore").await, vec!["Usage: restore <backup-file>"]);
}
