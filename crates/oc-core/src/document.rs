//! The document edit port and an in-memory implementation.
//!
//! Line numbers are 1-based throughout, matching what editors show.

use std::fmt;

use thiserror::Error;

/// Errors raised by a [`Document`] implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The requested line does not exist.
    #[error("line {line} is out of range (document has {len} lines)")]
    LineOutOfRange { line: usize, len: usize },
}

/// Saved viewport state: where the cursor is and which line is on top.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct View {
    pub cursor_line: usize,
    pub cursor_column: usize,
    pub top_line: usize,
}

/// Line-level access to the document that hosts a logbook.
///
/// Implementations decide how edits move the cursor; callers that must not
/// disturb it wrap edits in [`Document::save_view`] / [`Document::restore_view`].
pub trait Document {
    fn line_count(&self) -> usize;

    fn line(&self, n: usize) -> Result<&str, DocumentError>;

    fn set_line(&mut self, n: usize, text: String) -> Result<(), DocumentError>;

    /// Inserts `lines` after line `after`; `after == 0` inserts at the top.
    fn append_lines(&mut self, after: usize, lines: Vec<String>) -> Result<(), DocumentError>;

    fn delete_line(&mut self, n: usize) -> Result<(), DocumentError>;

    fn save_view(&self) -> View;

    fn restore_view(&mut self, view: View);
}

/// A document held in memory as a vector of lines.
///
/// Edits move the cursor the way a text editor would: inserting or deleting
/// above it shifts it, and rewriting a line leaves it at the end of that line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    /// `"\r\n"` if the source's first line ended that way, else `"\n"`.
    line_ending: &'static str,
    trailing_newline: bool,
    view: View,
}

impl TextBuffer {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub const fn view(&self) -> View {
        self.view
    }

    pub const fn set_view(&mut self, view: View) {
        self.view = view;
    }

    fn check(&self, n: usize) -> Result<usize, DocumentError> {
        if n == 0 || n > self.lines.len() {
            Err(DocumentError::LineOutOfRange {
                line: n,
                len: self.lines.len(),
            })
        } else {
            Ok(n - 1)
        }
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::from("")
    }
}

fn line_ending_of(text: &str) -> &'static str {
    match text.find('\n') {
        Some(idx) if text[..idx].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            line_ending: line_ending_of(text),
            trailing_newline: text.ends_with('\n'),
            view: View {
                cursor_line: 1,
                cursor_column: 0,
                top_line: 1,
            },
        }
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join(self.line_ending))?;
        if self.trailing_newline && !self.lines.is_empty() {
            f.write_str(self.line_ending)?;
        }
        Ok(())
    }
}

impl Document for TextBuffer {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, n: usize) -> Result<&str, DocumentError> {
        let idx = self.check(n)?;
        Ok(&self.lines[idx])
    }

    fn set_line(&mut self, n: usize, text: String) -> Result<(), DocumentError> {
        let idx = self.check(n)?;
        self.view.cursor_line = n;
        self.view.cursor_column = text.chars().count();
        self.lines[idx] = text;
        Ok(())
    }

    fn append_lines(&mut self, after: usize, lines: Vec<String>) -> Result<(), DocumentError> {
        if after > self.lines.len() {
            return Err(DocumentError::LineOutOfRange {
                line: after,
                len: self.lines.len(),
            });
        }
        let count = lines.len();
        self.lines.splice(after..after, lines);
        if self.view.cursor_line > after {
            self.view.cursor_line += count;
        }
        Ok(())
    }

    fn delete_line(&mut self, n: usize) -> Result<(), DocumentError> {
        let idx = self.check(n)?;
        self.lines.remove(idx);
        if self.view.cursor_line > n {
            self.view.cursor_line -= 1;
        } else if self.view.cursor_line == n {
            self.view.cursor_column = 0;
        }
        Ok(())
    }

    fn save_view(&self) -> View {
        self.view
    }

    fn restore_view(&mut self, view: View) {
        self.view = view;
    }
}
