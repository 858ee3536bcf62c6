//! Line span occupied by a logbook drawer.

use serde::{Deserialize, Serialize};

/// An inclusive, 1-based `[start_line, end_line]` span.
///
/// For a logbook, `start_line` is the `:LOGBOOK:` delimiter and `end_line`
/// is `:END:`. Values are immutable; resizing returns a new range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    start_line: usize,
    end_line: usize,
}

impl Range {
    /// Creates a range. `end_line` is clamped to be no earlier than `start_line`.
    pub const fn new(start_line: usize, end_line: usize) -> Self {
        let end_line = if end_line < start_line {
            start_line
        } else {
            end_line
        };
        Self {
            start_line,
            end_line,
        }
    }

    pub const fn start_line(self) -> usize {
        self.start_line
    }

    pub const fn end_line(self) -> usize {
        self.end_line
    }

    /// Number of lines covered, delimiters included.
    pub const fn len(self) -> usize {
        self.end_line - self.start_line + 1
    }

    pub const fn contains(self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    /// Lines strictly between the delimiters.
    pub fn body(self) -> std::ops::Range<usize> {
        self.start_line + 1..self.end_line
    }

    /// The same range with its end moved down by one line.
    #[must_use]
    pub const fn grown(self) -> Self {
        Self::new(self.start_line, self.end_line + 1)
    }

    /// The same range with its end moved up by one line.
    #[must_use]
    pub const fn shrunk(self) -> Self {
        Self::new(self.start_line, self.end_line.saturating_sub(1))
    }
}
