//! Row commands against a real SQLite database.

use pretty_assertions::assert_eq;

use portable_db::view::ViewEvent;

use super::{memory_shell, run, run_all, seed_people};

#[tokio::test]
async fn test_select_limit_returns_header_plus_n() {
    let (mut shell, _view) = memory_shell().await;
    seed_people(&mut shell).await;

    assert_eq!(
        run(&mut shell, "select limit 2").await,
        vec!["name\tage", "Ann Lee\t30", "Bob\t25"]
    );
    assert_eq!(run(&mut shell, "select people LIMIT 0").await, vec!["name\tage"]);
    assert_eq!(run(&mut shell, "select").await.len(), 6);
}

#[tokio::test]
async fn test_select_bad_limit_is_usage() {
    let (mut shell, _view) = memory_shell().await;
    seed_people(&mut shell).await;

    for line in ["select limit", "select limit -1", "select limit two", "select people 3"] {
        assert_eq!(
            run(&mut shell, line).await,
            vec!["Usage: select [table] [limit N]"],
            "{line}"
        );
    }
}

#[tokio::test]
async fn test_select_other_table_keeps_current() {
    let (mut shell, _view) = memory_shell().await;
    seed_people(&mut shell).await;
    run_all(&mut shell, &["sql CREATE TABLE pets (kind TEXT)"]).await;

    assert_eq!(run(&mut shell, "select pets").await, vec!["kind"]);
    assert_eq!(shell.session().current_table(), Some("people"));
}

#[tokio::test]
async fn test_update_missing_row_reports_zero() {
    let (mut shell, _view) = memory_shell().await;
    run_all(
        &mut shell,
        &["create people name TEXT, age INTEGER", "use people", "insert name=A age=1"],
    )
    .await;

    assert_eq!(
        run(&mut shell, "update id=3 age=31").await,
        vec!["Updated 0 row(s)."]
    );
}

#[tokio::test]
async fn test_update_and_delete_by_rowid() {
    let (mut shell, view) = memory_shell().await;
    seed_people(&mut shell).await;
    view.take();

    assert_eq!(
        run(&mut shell, "update id=3 age=31 name='Cy Young'").await,
        vec!["Updated 1 row(s)."]
    );
    assert_eq!(
        run(&mut shell, "search young").await,
        vec!["rowid\tname\tage", "3\tCy Young\t31"]
    );

    assert_eq!(run(&mut shell, "delete id=3").await, vec!["Deleted 1 row(s)."]);
    assert_eq!(run(&mut shell, "delete id=3").await, vec!["Deleted 0 row(s)."]);
    assert_eq!(run(&mut shell, "count").await, vec!["people: 4 record(s)"]);

    let reloads = view
        .take()
        .into_iter()
        .filter(|e| *e == ViewEvent::Reload("people".to_string()))
        .count();
    assert_eq!(reloads, 3);
}

#[tokio::test]
async fn test_update_delete_usage() {
    let (mut shell, _view) = memory_shell().await;
    seed_people(&mut shell).await;

    assert_eq!(
        run(&mut shell, "update age=3").await,
        vec!["Usage: update id=<rowid> key=value ..."]
    );
    assert_eq!(
        run(&mut shell, "delete id=1 extra").await,
        vec!["Usage: delete id=<rowid>"]
    );
    assert_eq!(run(&mut shell, "count").await, vec!["people: 5 record(s)"]);
}

#[tokio::test]
async fn test_update_without_pairs_reports_zero() {
    let (mut shell, _view) = memory_shell().await;
    seed_people(&mut shell).await;
    assert_eq!(run(&mut shell, "update id=1").await, vec!["Updated 0 row(s)."]);
}

#[tokio::test]
async fn test_insert_duplicate_keys_rejected() {
    let (mut shell, _view) = memory_shell().await;
    seed_people(&mut shell).await;

    assert_eq!(
        run(&mut shell, "insert name=a NAME=b").await,
        vec!["Error: Duplicate column 'NAME' in assignments"]
    );
    assert_eq!(run(&mut shell, "count").await, vec!["people: 5 record(s)"]);
}

#[tokio::test]
async fn test_insert_malformed_pair() {
    let (mut shell, _view) = memory_shell().await;
    seed_people(&mut shell).await;

    assert_eq!(
        run(&mut shell, "insert name").await,
        vec!["Error: Malformed pair 'name' (expected key=value)"]
    );
    assert_eq!(run(&mut shell, "insert").await, vec!["Usage: insert key=value ..."]);
}

#[tokio::test]
async fn test_insert_partial_columns_leaves_null() {
    let (mut shell, _view) = memory_shell().await;
    run_all(
        &mut shell,
        &["create people name TEXT, age INTEGER", "use people", "insert name=Solo"],
    )
    .await;

    assert_eq!(run(&mut shell, "select").await, vec!["name\tage", "Solo\tNULL"]);
}

#[tokio::test]
async fn test_row_commands_need_current_table() {
    let (mut shell, _view) = memory_shell().await;
    for line in ["insert a=1", "update id=1 a=2", "delete id=1", "search x"] {
        assert_eq!(
            run(&mut shell, line).await,
            vec!["Error: Select a table first."],
            "{line}"
        );
    }
    assert_eq!(run(&mut shell, "select").await, vec!["Usage: select [table] [limit N]"]);
}
