//! Shell-level behavior: dispatch, session state, transcript and view hooks.

use pretty_assertions::assert_eq;

use portable_db::commands::tokenize;
use portable_db::view::ViewEvent;

use super::{memory_shell, run, run_all, seed_people};

#[test]
fn test_tokenize_insert_line() {
    assert_eq!(
        tokenize(r#"insert name="Ann Lee" age=30"#).unwrap(),
        vec!["insert", "name=Ann Lee", "age=30"]
    );
}

#[tokio::test]
async fn test_unknown_command_changes_nothing() {
    let (mut shell, view) = memory_shell().await;
    seed_people(&mut shell).await;
    view.take();
    let session_before = shell.session().clone();

    for line in ["frobnicate", "SEL people", "exitt now", "tabless"] {
        assert_eq!(run(&mut shell, line).await, vec!["Unknown command."]);
    }

    assert_eq!(shell.session(), &session_before);
    assert!(view.take().is_empty());
}

#[tokio::test]
async fn test_use_missing_table_keeps_current() {
    let (mut shell, _view) = memory_shell().await;
    seed_people(&mut shell).await;

    assert_eq!(
        run(&mut shell, "use ghosts").await,
        vec!["Error: Table 'ghosts' not found."]
    );
    assert_eq!(shell.session().current_table(), Some("people"));
}

#[tokio::test]
async fn test_tables_sorted() {
    let (mut shell, _view) = memory_shell().await;
    assert_eq!(run(&mut shell, "tables").await, vec!["No tables."]);

    run_all(
        &mut shell,
        &["create zoo a TEXT", "create apples a TEXT", "create mid a TEXT"],
    )
    .await;
    assert_eq!(run(&mut shell, "tables").await, vec!["apples", "mid", "zoo"]);
}

#[tokio::test]
async fn test_schema_defaults_to_current() {
    let (mut shell, _view) = memory_shell().await;
    assert_eq!(run(&mut shell, "schema").await, vec!["Usage: schema [table]"]);

    seed_people(&mut shell).await;
    assert_eq!(
        run(&mut shell, "schema").await,
        vec!["column\ttype", "name\tTEXT", "age\tINTEGER"]
    );
}

#[tokio::test]
async fn test_non_select_sql_always_refreshes() {
    let (mut shell, view) = memory_shell().await;
    seed_people(&mut shell).await;
    view.take();

    assert_eq!(
        run(&mut shell, "sql DELETE FROM people WHERE age > 1000").await,
        vec!["Query OK, 0 row(s) affected."]
    );
    assert_eq!(
        view.take(),
        vec![ViewEvent::RefreshTables, ViewEvent::Reload("people".to_string())]
    );
}

#[tokio::test]
async fn test_sql_returning_write_counts_changed_rows() {
    let (mut shell, view) = memory_shell().await;
    seed_people(&mut shell).await;
    view.take();

    assert_eq!(
        run(
            &mut shell,
            r#"sql "INSERT INTO people (name) VALUES ('Fa'), ('Gi') RETURNING name""#
        )
        .await,
        vec!["Query OK, 2 row(s) affected."]
    );
    assert_eq!(
        run(&mut shell, "sql UPDATE people SET age = 0 WHERE age < 26 RETURNING rowid").await,
        vec!["Query OK, 2 row(s) affected."]
    );
    assert_eq!(run(&mut shell, "count").await, vec!["people: 7 record(s)"]);
    assert_eq!(
        view.take(),
        vec![
            ViewEvent::RefreshTables,
            ViewEvent::Reload("people".to_string()),
            ViewEvent::RefreshTables,
            ViewEvent::Reload("people".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_sql_without_current_table_only_refreshes_list() {
    let (mut shell, view) = memory_shell().await;

    assert_eq!(
        run(&mut shell, "sql CREATE TABLE t (a TEXT)").await,
        vec!["Query OK, 0 row(s) affected."]
    );
    assert_eq!(view.take(), vec![ViewEvent::RefreshTables]);
}

#[tokio::test]
async fn test_sql_select_renders_rows() {
    let (mut shell, view) = memory_shell().await;
    seed_people(&mut shell).await;
    view.take();

    assert_eq!(
        run(
            &mut shell,
            r#"sql "SELECT name FROM people WHERE age < 26 ORDER BY name""#
        )
        .await,
        vec!["name", "Bob", "Di"]
    );
    assert!(view.take().is_empty());
}

#[tokio::test]
async fn test_sql_error_is_reported_verbatim() {
    let (mut shell, _view) = memory_shell().await;
    assert_eq!(
        run(&mut shell, "sql SELEC nothing").await,
        vec![r#"Error: near "SELEC": syntax error"#]
    );
}

#[tokio::test]
async fn test_dropped_current_table_is_cleared() {
    let (mut shell, _view) = memory_shell().await;
    seed_people(&mut shell).await;

    assert_eq!(
        run(&mut shell, "drop people").await,
        vec!["Table 'people' dropped."]
    );
    assert_eq!(shell.session().current_table(), None);
    assert_eq!(
        run(&mut shell, "insert name=x").await,
        vec!["Error: Select a table first."]
    );
}

#[tokio::test]
async fn test_stale_current_table_surfaces_engine_error() {
    let (mut shell, _view) = memory_shell().await;
    seed_people(&mut shell).await;

    run_all(&mut shell, &["sql DROP TABLE people"]).await;
    assert_eq!(shell.session().current_table(), Some("people"));
    assert_eq!(
        run(&mut shell, "select").await,
        vec!["Error: no such table: people"]
    );
}

#[tokio::test]
async fn test_help_lists_commands() {
    let (mut shell, _view) = memory_shell().await;
    for alias in ["help", "h", "?", "HELP"] {
        let lines = run(&mut shell, alias).await;
        assert!(lines.iter().any(|l| l.contains("use <table>")), "{alias}");
        assert!(lines.iter().any(|l| l.contains("backup")), "{alias}");
    }
}

#[tokio::test]
async fn test_clear_empties_transcript_only() {
    let (mut shell, _view) = memory_shell().await;
    seed_people(&mut shell).await;
    assert!(!shell.transcript().is_empty());

    assert!(run(&mut shell, "clear").await.is_empty());
    assert!(shell.transcript().is_empty());
    assert_eq!(shell.session().current_table(), Some("people"));
    assert_eq!(run(&mut shell, "count").await, vec!["people: 5 record(s)"]);
}

#[tokio::test]
async fn test_parse_error_runs_nothing() {
    let (mut shell, view) = memory_shell().await;
    seed_people(&mut shell).await;
    view.take();

    let lines = run(&mut shell, "insert name='unterminated").await;
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Error: unterminated single quote"));
    assert!(view.take().is_empty());
    assert_eq!(run(&mut shell, "count").await, vec!["people: 5 record(s)"]);
}

#[tokio::test]
async fn test_invalid_identifier_is_rejected() {
    let (mut shell, _view) = memory_shell().await;
    let lines = run(&mut shell, r#"select "people; DROP TABLE x""#).await;
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Error: Invalid table name"));
}

#[tokio::test]
async fn test_info_in_memory() {
    let (mut shell, _view) = memory_shell().await;
    seed_people(&mut shell).await;

    let lines = run(&mut shell, "info").await;
    assert!(lines.contains(&"Database: (in memory)".to_string()));
    assert!(lines.contains(&"Tables: 1".to_string()));
    assert!(lines.contains(&"Total Records: 5".to_string()));
    assert!(lines.contains(&"  • people: 5 records".to_string()));
}
