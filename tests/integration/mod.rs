//! Integration tests for portable-db.

pub mod backup_test;
pub mod rows_test;
pub mod shell_test;
pub mod transfer_test;

use std::path::Path;
use std::sync::Arc;

use portable_db::db::SqliteStore;
use portable_db::view::RecordingView;
use portable_db::Shell;

/// A shell over an in-memory database with a recording view.
pub async fn memory_shell() -> (Shell, Arc<RecordingView>) {
    let store = SqliteStore::open_in_memory()
        .await
        .expect("open in-memory database");
    let view = Arc::new(RecordingView::new());
    let shell = Shell::new(Arc::new(store)).with_view(view.clone());
    (shell, view)
}

/// A shell over a database file at `path`.
pub async fn file_shell(path: &Path) -> Shell {
    let store = SqliteStore::open(path).await.expect("open database file");
    Shell::new(Arc::new(store))
}

/// Runs one line and returns the lines it added to the transcript.
pub async fn run(shell: &mut Shell, line: &str) -> Vec<String> {
    shell.execute_line(line).await.lines
}

/// Runs several lines, asserting none of them produced an error.
pub async fn run_all(shell: &mut Shell, lines: &[&str]) {
    for line in lines {
        let output = run(shell, line).await;
        assert!(
            !output.iter().any(|l| l.starts_with("Error:") || l.starts_with("Usage:")),
            "`{line}` failed: {output:?}"
        );
    }
}

/// Creates `people(name TEXT, age INTEGER)` with five rows and selects it.
pub async fn seed_people(shell: &mut Shell) {
    run_all(
        shell,
        &[
            "create people name TEXT, age INTEGER",
            "use people",
            r#"insert name="Ann Lee" age=30"#,
            "insert name=Bob age=25",
            "insert name=Cy age=41",
            "insert name=Di age=19",
            "insert name=Ed age=52",
        ],
    )
    .await;
}
