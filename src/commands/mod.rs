//! Command parsing and dispatch for portable-db.
//!
//! Parsing (tokenizer, router) is kept apart from execution (handlers) so
//! command lines can be unit tested without a database.

pub mod definitions;
pub mod handlers;
pub mod help;
pub mod output;
pub mod router;
pub mod tokenizer;

pub use definitions::{find_command, CommandCategory, CommandDef, CommandKind, COMMANDS};
pub use handlers::CommandContext;
pub use output::{CommandOutput, ControlAction};
pub use router::{Command, CommandRouter};
pub use tokenizer::{tokenize, ParseError};
