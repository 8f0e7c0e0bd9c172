//! Import and export through the shell, using temporary files.

use pretty_assertions::assert_eq;
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;

use portable_db::view::ViewEvent;

use super::{memory_shell, run, run_all, seed_people};

#[tokio::test]
async fn test_csv_import_reproduces_rows_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.csv");
    std::fs::write(&path, "name,age,city\nAnn,30,\"New York, NY\"\nBob,007,Paris\n").unwrap();

    let (mut shell, _view) = memory_shell().await;
    let import = format!("import csv '{}' t1", path.display());
    assert_eq!(
        run(&mut shell, &import).await,
        vec!["Imported 2 row(s) into 't1'."]
    );

    run_all(&mut shell, &["use t1"]).await;
    assert_eq!(
        run(&mut shell, "select").await,
        vec!["name\tage\tcity", "Ann\t30\tNew York, NY", "Bob\t007\tParis"]
    );
    assert_eq!(
        run(&mut shell, "schema").await,
        vec!["column\ttype", "name\tTEXT", "age\tTEXT", "city\tTEXT"]
    );
}

#[tokio::test]
async fn test_import_into_current_table_reloads_view() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("more.csv");
    std::fs::write(&path, "name,age\nZed,99\n").unwrap();

    let (mut shell, view) = memory_shell().await;
    seed_people(&mut shell).await;
    view.take();

    let import = format!("import csv '{}' people", path.display());
    assert_eq!(
        run(&mut shell, &import).await,
        vec!["Imported 1 row(s) into 'people'."]
    );
    assert_eq!(
        view.take(),
        vec![ViewEvent::RefreshTables, ViewEvent::Reload("people".to_string())]
    );
    assert_eq!(run(&mut shell, "count").await, vec!["people: 6 record(s)"]);
}

#[tokio::test]
async fn test_json_export_import_keeps_count_and_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.json");

    let (mut shell, _view) = memory_shell().await;
    seed_people(&mut shell).await;

    let export = format!("export json '{}'", path.display());
    assert_eq!(
        run(&mut shell, &export).await,
        vec![format!("Exported 5 row(s) to {}.", path.display())]
    );

    let exported: JsonValue = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let records = exported.as_array().unwrap();
    assert_eq!(records.len(), 5);
    assert_eq!(records[0]["name"], "Ann Lee");
    assert_eq!(records[0]["age"], 30);

    let import = format!("import json '{}' people_copy", path.display());
    assert_eq!(
        run(&mut shell, &import).await,
        vec!["Imported 5 row(s) into 'people_copy'."]
    );
    assert_eq!(
        run(&mut shell, "count people_copy").await,
        vec!["people_copy: 5 record(s)"]
    );

    let original = run(&mut shell, "schema people").await;
    let copy = run(&mut shell, "schema people_copy").await;
    let names = |lines: &[String]| -> BTreeSet<String> {
        lines
            .iter()
            .skip(1)
            .filter_map(|l| l.split('\t').next().map(str::to_string))
            .collect()
    };
    assert_eq!(names(&original), names(&copy));
}

#[tokio::test]
async fn test_csv_export_writes_header_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");

    let (mut shell, _view) = memory_shell().await;
    seed_people(&mut shell).await;
    run_all(&mut shell, &["insert name=Nully"]).await;

    let export = format!("export CSV '{}' people", path.display());
    assert_eq!(
        run(&mut shell, &export).await,
        vec![format!("Exported 6 row(s) to {}.", path.display())]
    );

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "name,age");
    assert_eq!(lines[1], "Ann Lee,30");
    assert_eq!(lines[6], "Nully,");
}

#[tokio::test]
async fn test_export_empty_table_writes_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");

    let (mut shell, _view) = memory_shell().await;
    run_all(&mut shell, &["create empty a TEXT, b TEXT"]).await;

    let export = format!("export csv '{}' empty", path.display());
    assert_eq!(
        run(&mut shell, &export).await,
        vec![format!("Exported 0 row(s) to {}.", path.display())]
    );
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n");
}

#[tokio::test]
async fn test_export_without_table() {
    let dir = tempfile::tempdir().unwrap();
    let (mut shell, _view) = memory_shell().await;

    let export = format!("export csv '{}'", dir.path().join("x.csv").display());
    assert_eq!(run(&mut shell, &export).await, vec!["Error: Specify a table."]);
}

#[tokio::test]
async fn test_transfer_usage_errors() {
    let (mut shell, _view) = memory_shell().await;

    assert_eq!(
        run(&mut shell, "export csv").await,
        vec!["Usage: export (csv|json) <path> [table]"]
    );
    assert_eq!(
        run(&mut shell, "export xml out.xml").await,
        vec!["Usage: export (csv|json) <path> [table]"]
    );
    assert_eq!(
        run(&mut shell, "import csv data.csv").await,
        vec!["Usage: import (csv|json) <path> <table>"]
    );
}

#[tokio::test]
async fn test_import_validation_errors() {
    let dir = tempfile::tempdir().unwrap();
    let empty_csv = dir.path().join("empty.csv");
    let empty_json = dir.path().join("empty.json");
    let scalar_json = dir.path().join("scalar.json");
    std::fs::write(&empty_csv, "").unwrap();
    std::fs::write(&empty_json, "[]").unwrap();
    std::fs::write(&scalar_json, "[1, 2, 3]").unwrap();

    let (mut shell, view) = memory_shell().await;

    assert_eq!(
        run(&mut shell, &format!("import csv '{}' t", empty_csv.display())).await,
        vec!["Error: CSV has no header"]
    );
    for path in [&empty_json, &scalar_json] {
        assert_eq!(
            run(&mut shell, &format!("import json '{}' t", path.display())).await,
            vec!["Error: JSON must be a non-empty array of objects"]
        );
    }
    assert!(view.take().is_empty());
    assert_eq!(run(&mut shell, "tables").await, vec!["No tables."]);
}

#[tokio::test]
async fn test_import_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let (mut shell, _view) = memory_shell().await;

    let lines = run(
        &mut shell,
        &format!("import csv '{}' t", dir.path().join("absent.csv").display()),
    )
    .await;
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Error: Failed to read"));
}

#[tokio::test]
async fn test_json_import_fills_missing_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sparse.json");
    std::fs::write(&path, r#"[{"a": "x", "b": 1}, {"a": "y"}, {"b": null}]"#).unwrap();

    let (mut shell, _view) = memory_shell().await;
    run_all(
        &mut shell,
        &[&format!("import json '{}' sparse", path.display()), "use sparse"],
    )
    .await;

    assert_eq!(
        run(&mut shell, "select").await,
        vec!["a\tb", "x\t1", "y\t", "\tNULL"]
    );
}
