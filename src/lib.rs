//! portable-db - a portable SQLite data manager with a command shell.
//!
//! The library exposes the shell and its collaborators so a host view can
//! embed it; the binary wraps it in a line-editing REPL.

pub mod backup;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod repl;
pub mod safety;
pub mod shell;
pub mod view;

pub use error::{Result, ShellError};
pub use shell::{LineOutcome, Session, Shell, Transcript};
