//! Front ends that feed lines into a `Shell`.
//!
//! The interactive loop uses rustyline with a persistent history file. Batch
//! mode runs a fixed list of lines, echoing each one before its output.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config as EditorConfig, Editor};
use tracing::{debug, info, warn};

use crate::config::ShellConfig;
use crate::error::{Result, ShellError};
use crate::shell::{LineOutcome, Shell};

/// Settings for the interactive loop.
#[derive(Debug, Clone)]
pub struct ReplSettings {
    pub prompt: String,
    /// History file; `None` disables persistent history.
    pub history_file: Option<PathBuf>,
    pub history_size: usize,
}

impl ReplSettings {
    /// Builds settings from the shell config, optionally without history.
    pub fn from_config(config: &ShellConfig, no_history: bool) -> Self {
        Self {
            prompt: config.prompt.clone(),
            history_file: if no_history {
                None
            } else {
                config.history_path()
            },
            history_size: config.history_size,
        }
    }
}

/// Runs the interactive loop until `quit`, `exit` or Ctrl-D.
pub async fn run_interactive(shell: &mut Shell, settings: &ReplSettings) -> Result<()> {
    let config = EditorConfig::builder()
        .max_history_size(settings.history_size)
        .map_err(editor_error)?
        .auto_add_history(true)
        .build();
    let mut rl: Editor<(), DefaultHistory> = Editor::with_config(config).map_err(editor_error)?;

    if let Some(path) = &settings.history_file {
        if path.exists() {
            if let Err(e) = rl.load_history(path) {
                warn!("Could not load history from {}: {e}", path.display());
            }
        }
    }

    println!("portable-db {} - type 'help' for commands", env!("CARGO_PKG_VERSION"));

    loop {
        match rl.readline(&settings.prompt) {
            Ok(line) => {
                let outcome = shell.execute_line(&line).await;
                if outcome.cleared() {
                    clear_screen();
                }
                print_lines(&outcome);
                if outcome.should_exit() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                debug!("Line cancelled");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                save_history(&mut rl, settings);
                return Err(editor_error(e));
            }
        }
    }

    save_history(&mut rl, settings);
    info!("Interactive session ended");
    Ok(())
}

/// Runs lines in order, echoing each after the prompt. Stops early on `quit`.
///
/// Command failures are part of the output and never stop the batch.
pub async fn run_batch<W: Write>(
    shell: &mut Shell,
    lines: &[String],
    prompt: &str,
    out: &mut W,
) -> Result<()> {
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        writeln!(out, "{prompt}{line}")?;

        let outcome = shell.execute_line(line).await;
        for rendered in &outcome.lines {
            writeln!(out, "{rendered}")?;
        }
        if outcome.should_exit() {
            break;
        }
    }
    out.flush()?;
    Ok(())
}

/// Reads script lines from a file, or from stdin when the source is `-`.
pub fn read_script(source: &str) -> Result<Vec<String>> {
    let content = if source == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(source)
            .map_err(|e| ShellError::io(format!("Failed to read script {source}: {e}")))?
    };
    Ok(script_lines(&content))
}

/// Splits script text into lines, skipping `#` comment lines.
pub fn script_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn print_lines(outcome: &LineOutcome) {
    for line in &outcome.lines {
        println!("{line}");
    }
}

fn clear_screen() {
    if let Err(e) = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0)) {
        warn!("Could not clear terminal: {e}");
    }
}

fn save_history(rl: &mut Editor<(), DefaultHistory>, settings: &ReplSettings) {
    let Some(path) = &settings.history_file else {
        return;
    };
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!("Could not create history directory: {e}");
            return;
        }
    }
    if let Err(e) = rl.save_history(path) {
        warn!("Could not save history to {}: {e}", path.display());
    }
}

fn editor_error(e: ReadlineError) -> ShellError {
    ShellError::internal(format!("Line editor error: {e}"))
}
