//! Command definitions for declarative command metadata.
//!
//! The `COMMANDS` table is the single source for dispatch, usage lines and
//! help text. Lookup is exact on the case-folded name or a listed alias.

use super::help::HELP_FOOTER;

/// The closed set of commands the shell understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Help,
    Tables,
    Use,
    Schema,
    Select,
    Insert,
    Update,
    Delete,
    Sql,
    Export,
    Import,
    Backup,
    Restore,
    Info,
    Clear,
    Create,
    Drop,
    Search,
    Count,
    Quit,
}

/// Definition of a command.
#[derive(Debug, Clone)]
pub struct CommandDef {
    /// Which handler the command dispatches to.
    pub kind: CommandKind,
    /// Primary command name.
    pub name: &'static str,
    /// Alternative names for the command.
    pub aliases: &'static [&'static str],
    /// Short description shown in help.
    pub description: &'static str,
    /// Usage line, also used for usage errors.
    pub usage: &'static str,
    /// Category for grouping in help.
    pub category: CommandCategory,
}

/// Category for grouping commands in help output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandCategory {
    /// Table selection and structure.
    Tables,
    /// Row-level reads and writes.
    Rows,
    /// Import and export.
    Transfer,
    /// Shell and database housekeeping.
    General,
}

impl CommandCategory {
    /// Returns the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Tables => "Table commands",
            Self::Rows => "Row commands",
            Self::Transfer => "Import/export",
            Self::General => "General commands",
        }
    }
}

/// All command definitions.
pub static COMMANDS: &[CommandDef] = &[
    // Table commands
    CommandDef {
        kind: CommandKind::Tables,
        name: "tables",
        aliases: &[],
        description: "List all tables",
        usage: "tables",
        category: CommandCategory::Tables,
    },
    CommandDef {
        kind: CommandKind::Use,
        name: "use",
        aliases: &[],
        description: "Select the current table",
        usage: "use <table>",
        category: CommandCategory::Tables,
    },
    CommandDef {
        kind: CommandKind::Schema,
        name: "schema",
        aliases: &[],
        description: "Show column names and types",
        usage: "schema [table]",
        category: CommandCategory::Tables,
    },
    CommandDef {
        kind: CommandKind::Create,
        name: "create",
        aliases: &[],
        description: "Create a table",
        usage: "create <table> <column> <TYPE>[, <column> <TYPE> ...]",
        category: CommandCategory::Tables,
    },
    CommandDef {
        kind: CommandKind::Drop,
        name: "drop",
        aliases: &[],
        description: "Drop a table",
        usage: "drop <table>",
        category: CommandCategory::Tables,
    },
    CommandDef {
        kind: CommandKind::Count,
        name: "count",
        aliases: &[],
        description: "Count records in a table",
        usage: "count [table]",
        category: CommandCategory::Tables,
    },
    // Row commands
    CommandDef {
        kind: CommandKind::Select,
        name: "select",
        aliases: &[],
        description: "Show rows",
        usage: "select [table] [limit N]",
        category: CommandCategory::Rows,
    },
    CommandDef {
        kind: CommandKind::Insert,
        name: "insert",
        aliases: &[],
        description: "Insert a row into the current table",
        usage: "insert key=value ...",
        category: CommandCategory::Rows,
    },
    CommandDef {
        kind: CommandKind::Update,
        name: "update",
        aliases: &[],
        description: "Update a row of the current table by rowid",
        usage: "update id=<rowid> key=value ...",
        category: CommandCategory::Rows,
    },
    CommandDef {
        kind: CommandKind::Delete,
        name: "delete",
        aliases: &[],
        description: "Delete a row of the current table by rowid",
        usage: "delete id=<rowid>",
        category: CommandCategory::Rows,
    },
    CommandDef {
        kind: CommandKind::Search,
        name: "search",
        aliases: &[],
        description: "Find rows of the current table containing text",
        usage: "search <text>",
        category: CommandCategory::Rows,
    },
    CommandDef {
        kind: CommandKind::Sql,
        name: "sql",
        aliases: &[],
        description: "Execute raw SQL directly",
        usage: "sql <query>",
        category: CommandCategory::Rows,
    },
    // Import/export
    CommandDef {
        kind: CommandKind::Export,
        name: "export",
        aliases: &[],
        description: "Write a table to a CSV or JSON file",
        usage: "export (csv|json) <path> [table]",
        category: CommandCategory::Transfer,
    },
    CommandDef {
        kind: CommandKind::Import,
        name: "import",
        aliases: &[],
        description: "Load a CSV or JSON file into a table",
        usage: "import (csv|json) <path> <table>",
        category: CommandCategory::Transfer,
    },
    // General commands
    CommandDef {
        kind: CommandKind::Backup,
        name: "backup",
        aliases: &[],
        description: "Create a timestamped copy of the database",
        usage: "backup",
        category: CommandCategory::General,
    },
    CommandDef {
        kind: CommandKind::Restore,
        name: "restore",
        aliases: &[],
        description: "Replace the database with a backup file",
        usage: "restore <backup-file>",
        category: CommandCategory::General,
    },
    CommandDef {
        kind: CommandKind::Info,
        name: "info",
        aliases: &[],
        description: "Show database file, size and tables",
        usage: "info",
        category: CommandCategory::General,
    },
    CommandDef {
        kind: CommandKind::Clear,
        name: "clear",
        aliases: &[],
        description: "Clear the output transcript",
        usage: "clear",
        category: CommandCategory::General,
    },
    CommandDef {
        kind: CommandKind::Help,
        name: "help",
        aliases: &["h", "?"],
        description: "Show this help message",
        usage: "help",
        category: CommandCategory::General,
    },
    CommandDef {
        kind: CommandKind::Quit,
        name: "quit",
        aliases: &["exit"],
        description: "Leave the shell",
        usage: "quit",
        category: CommandCategory::General,
    },
];

/// Generates the help text from command definitions.
pub fn generate_help_text() -> String {
    let categories = [
        CommandCategory::Tables,
        CommandCategory::Rows,
        CommandCategory::Transfer,
        CommandCategory::General,
    ];

    let width = COMMANDS.iter().map(|c| c.usage.len()).max().unwrap_or(0);

    let category_blocks = categories
        .iter()
        .filter_map(|category| {
            let cmds: Vec<_> = COMMANDS
                .iter()
                .filter(|c| c.category == *category)
                .collect();

            if cmds.is_empty() {
                return None;
            }

            let command_lines = cmds
                .iter()
                .map(|cmd| {
                    let aliases = if cmd.aliases.is_empty() {
                        String::new()
                    } else {
                        format!(" (also: {})", cmd.aliases.join(", "))
                    };
                    format!(
                        "  {:<width$}  - {}{}\n",
                        cmd.usage,
                        cmd.description,
                        aliases,
                        width = width
                    )
                })
                .collect::<Vec<_>>()
                .join("");

            Some(format!("{}:\n{}\n", category.display_name(), command_lines))
        })
        .collect::<Vec<_>>()
        .join("");

    format!("{}{}", category_blocks, HELP_FOOTER)
}

/// Finds a command definition by name or alias, ignoring case.
pub fn find_command(name: &str) -> Option<&'static CommandDef> {
    let name_lower = name.to_lowercase();
    COMMANDS
        .iter()
        .find(|c| c.name == name_lower || c.aliases.iter().any(|a| *a == name_lower))
}

/// Returns the definition for a command kind.
pub fn definition(kind: CommandKind) -> &'static CommandDef {
    COMMANDS
        .iter()
        .find(|c| c.kind == kind)
        .unwrap_or(&COMMANDS[0])
}

/// Returns the usage line for a command kind.
pub fn usage(kind: CommandKind) -> &'static str {
    definition(kind).usage
}
