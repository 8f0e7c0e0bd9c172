//! Help text constants for shell commands.

/// Notes appended after the generated command list.
pub const HELP_FOOTER: &str = r#"Quoting:
  Values with spaces need quotes: insert name="Ann Lee" city='New York'
  Quote SQL containing string literals: sql "SELECT * FROM people WHERE name = 'Ann'"

Notes:
  Commands without a table argument use the table chosen with `use`.
  Rows are addressed by SQLite rowid (see `search` for rowids).
  Table and column names may contain only letters, digits and underscores.

Keyboard shortcuts:
  Ctrl+C          - Cancel the current line
  Ctrl+D          - Exit the shell
  Up/Down         - History navigation"#;
