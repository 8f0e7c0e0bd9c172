//! Tokenizer for shell command lines.
//!
//! Splits a raw line into words using POSIX shell-like rules:
//! - Unquoted whitespace separates words
//! - Single quotes: `'hello world'` → `hello world` (no escapes inside)
//! - Double quotes: `"say \"hi\""` → `say "hi"`
//! - Backslash outside quotes escapes the next character
//! - Adjacent parts join: `name="Ann Lee"` → `name=Ann Lee`

use std::iter::Peekable;
use std::str::CharIndices;

type Chars<'a> = Peekable<CharIndices<'a>>;

/// Tokenizes a command line into words.
///
/// Empty or whitespace-only input produces no words. An unterminated quote
/// or a trailing lone backslash is an error; no partial result is returned.
pub fn tokenize(input: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    loop {
        // Skip whitespace
        while matches!(chars.peek(), Some((_, c)) if c.is_whitespace()) {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }
        if let Some(word) = collect_word(&mut chars)? {
            tokens.push(word);
        }
    }

    Ok(tokens)
}

/// Collects one word, joining quoted and unquoted parts until unquoted whitespace.
///
/// Returns `None` when only line continuations were consumed. An explicit
/// empty quote such as `''` is still a word.
fn collect_word(chars: &mut Chars<'_>) -> Result<Option<String>, ParseError> {
    let mut word = String::new();
    let mut quoted = false;

    while let Some(&(pos, c)) = chars.peek() {
        if c.is_whitespace() {
            break;
        }
        chars.next();

        match c {
            '\'' => {
                quoted = true;
                collect_single_quoted(chars, pos, &mut word)?
            }
            '"' => {
                quoted = true;
                collect_double_quoted(chars, pos, &mut word)?
            }
            '\\' => match chars.next() {
                // Line continuation
                Some((_, '\n')) => {}
                Some((_, escaped)) => word.push(escaped),
                None => {
                    return Err(ParseError::new(pos, "trailing backslash")
                        .with_hint("Escape it as \\\\ or quote the value"))
                }
            },
            _ => word.push(c),
        }
    }

    Ok((quoted || !word.is_empty()).then_some(word))
}

/// Collects characters up to the closing single quote. Nothing is escaped.
fn collect_single_quoted(
    chars: &mut Chars<'_>,
    start: usize,
    word: &mut String,
) -> Result<(), ParseError> {
    for (_, c) in chars.by_ref() {
        if c == '\'' {
            return Ok(());
        }
        word.push(c);
    }
    Err(ParseError::new(start, "unterminated single quote").with_hint("Close the quote with '"))
}

/// Collects characters up to the closing double quote.
///
/// A backslash only escapes `"`, `\`, `$`, `` ` `` and newline; before any
/// other character it is kept literally.
fn collect_double_quoted(
    chars: &mut Chars<'_>,
    start: usize,
    word: &mut String,
) -> Result<(), ParseError> {
    while let Some((_, c)) = chars.next() {
        match c {
            '"' => return Ok(()),
            '\\' => match chars.peek() {
                Some(&(_, next @ ('"' | '\\' | '$' | '`'))) => {
                    chars.next();
                    word.push(next);
                }
                Some(&(_, '\n')) => {
                    chars.next();
                }
                _ => word.push('\\'),
            },
            _ => word.push(c),
        }
    }
    Err(ParseError::new(start, "unterminated double quote").with_hint("Close the quote with \""))
}

/// Parse error with context for helpful error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Byte offset in the input where the offending construct starts.
    pub position: usize,
    /// Error message describing what went wrong.
    pub message: String,
    /// Optional hint for how to fix the error.
    pub hint: Option<String>,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
            hint: None,
        }
    }

    /// Adds a hint to the error.
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        Self {
            hint: Some(hint.into()),
            ..self
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at column {}", self.message, self.position + 1)?;
        if let Some(hint) = &self.hint {
            write!(f, ". Hint: {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}
