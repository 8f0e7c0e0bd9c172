//! The command shell: session state, transcript and line execution.
//!
//! A `Shell` owns its collaborators and processes one line at a time. Every
//! line is parsed, dispatched and rendered to the transcript before the next
//! one is accepted.

use std::sync::Arc;

use tracing::debug;

use crate::backup::{BackupService, NoBackup};
use crate::commands::handlers::{self, CommandContext};
use crate::commands::{CommandOutput, CommandRouter, ControlAction};
use crate::db::Storage;
use crate::view::{NoopView, ViewHooks};

/// Shell-local state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    current_table: Option<String>,
}

impl Session {
    /// The table chosen with `use`, if any.
    pub fn current_table(&self) -> Option<&str> {
        self.current_table.as_deref()
    }

    pub fn set_current_table(&mut self, table: String) {
        self.current_table = Some(table);
    }

    pub fn clear_current_table(&mut self) {
        self.current_table = None;
    }
}

/// Append-only log of rendered output. Only `clear` empties it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn append(&mut self, lines: &[String]) {
        self.lines.extend_from_slice(lines);
    }

    fn clear(&mut self) {
        self.lines.clear();
    }
}

/// What one input line produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineOutcome {
    /// Lines appended to the transcript.
    pub lines: Vec<String>,
    /// Control action requested by the command.
    pub control: Option<ControlAction>,
}

impl LineOutcome {
    pub fn should_exit(&self) -> bool {
        self.control == Some(ControlAction::Exit)
    }

    pub fn cleared(&self) -> bool {
        self.control == Some(ControlAction::ClearTranscript)
    }
}

/// The command shell.
pub struct Shell {
    storage: Arc<dyn Storage>,
    view: Arc<dyn ViewHooks>,
    backup: Arc<dyn BackupService>,
    session: Session,
    transcript: Transcript,
}

impl Shell {
    /// Creates a shell over the given storage with no view and no backups.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            view: Arc::new(NoopView),
            backup: Arc::new(NoBackup),
            session: Session::default(),
            transcript: Transcript::default(),
        }
    }

    /// Sets the view collaborator.
    pub fn with_view(mut self, view: Arc<dyn ViewHooks>) -> Self {
        self.view = view;
        self
    }

    /// Sets the backup collaborator.
    pub fn with_backup(mut self, backup: Arc<dyn BackupService>) -> Self {
        self.backup = backup;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Parses, dispatches and renders one line.
    ///
    /// Never fails: parse and handler errors become transcript lines. Empty
    /// input does nothing.
    pub async fn execute_line(&mut self, line: &str) -> LineOutcome {
        let output = match CommandRouter::parse(line) {
            Ok(None) => return LineOutcome::default(),
            Ok(Some(command)) => {
                let mut ctx = CommandContext {
                    storage: self.storage.as_ref(),
                    session: &mut self.session,
                    view: self.view.as_ref(),
                    backup: self.backup.as_ref(),
                };
                handlers::execute(&command, &mut ctx)
                    .await
                    .unwrap_or_else(|err| {
                        debug!(category = err.category(), "Command failed: {err}");
                        CommandOutput::from(err)
                    })
            }
            Err(err) => {
                debug!("Line rejected: {err}");
                CommandOutput::from(err)
            }
        };

        self.apply(output)
    }

    /// Writes rendered output to the transcript, honoring control actions.
    fn apply(&mut self, output: CommandOutput) -> LineOutcome {
        let control = output.control();
        if control == Some(ControlAction::ClearTranscript) {
            self.transcript.clear();
        }

        let lines = output.render();
        self.transcript.append(&lines);
        LineOutcome { lines, control }
    }
}
