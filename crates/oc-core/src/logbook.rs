//! The logbook: a drawer of clock entries kept in sync with its document.
//!
//! A [`Logbook`] owns the [`Range`] of its drawer and the entries parsed from
//! it, ordered top to bottom. Every mutation edits the document through the
//! [`Document`] port first and then updates the model, so a failed edit
//! leaves the model untouched.
//!
//! Each entry remembers its current line. Inserting or deleting a clock line
//! shifts the entries below it and moves the end of the range, which keeps
//! entry lines, range and document text in step across successive edits.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::clock::Clock;
use crate::document::{Document, DocumentError};
use crate::duration::Duration;
use crate::entry::{EntryId, Interval, LogEntry};
use crate::parser::{parse_clock_lines, parse_region};
use crate::range::Range;
use crate::scan::TimestampToken;
use crate::timestamp::{TimeWindow, Timestamp};

/// Trailing `=> H:MM` estimate written after a closed clock line.
static ESTIMATE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*=>\s*[+-]?\d+:\d{2}\s*$").unwrap());

pub const DRAWER_START: &str = ":LOGBOOK:";
pub const DRAWER_END: &str = ":END:";

/// Logbook errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogbookError {
    /// The underlying document rejected an edit or read.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// A clock is already running in this logbook.
    #[error("already clocked in since {since}")]
    AlreadyClocked { since: Timestamp },

    /// An entry's line is not between the drawer delimiters.
    #[error("line {line} is outside the logbook body (lines {first}-{last})")]
    OutsideDrawer {
        line: usize,
        first: usize,
        last: usize,
    },

    /// Two entries claim the same line.
    #[error("line {line} already holds a clock entry")]
    LineTaken { line: usize },
}

/// Indentation applied to lines written into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indent {
    #[default]
    Flat,
    /// Indent by this many spaces.
    Depth(usize),
}

impl Indent {
    pub fn prefix(self) -> String {
        match self {
            Self::Flat => String::new(),
            Self::Depth(n) => " ".repeat(n),
        }
    }
}

/// Outcome of a successful clock-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockedIn {
    pub id: EntryId,
    pub start: Timestamp,
}

/// Outcome of a successful clock-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockedOut {
    pub id: EntryId,
    pub start: Timestamp,
    pub end: Timestamp,
    pub duration: Duration,
}

/// Returns the leading whitespace of a line.
fn leading_indent(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

fn clock_line(indent: &str, start: Timestamp) -> String {
    format!("{indent}CLOCK: {}", start.to_wrapped_string())
}

/// A logbook drawer and its clock entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logbook {
    range: Range,
    items: Vec<LogEntry>,
}

impl Logbook {
    /// Creates a logbook from already-parsed entries.
    pub fn new(range: Range, mut items: Vec<LogEntry>) -> Self {
        items.sort_by_key(LogEntry::line);
        if items.iter().filter(|e| e.is_open()).count() > 1 {
            tracing::warn!(
                start_line = range.start_line(),
                "logbook has more than one running clock"
            );
        }
        Self { range, items }
    }

    /// Builds a logbook from the raw region lines and pre-scanned timestamp tokens.
    pub fn from_lines<S: AsRef<str>>(
        lines: &[S],
        range: Range,
        tokens: &[TimestampToken],
    ) -> Self {
        Self::new(range, parse_clock_lines(lines, range, tokens))
    }

    /// Reads the drawer at `range` from the document and parses it.
    pub fn load<D: Document + ?Sized>(doc: &D, range: Range) -> Result<Self, LogbookError> {
        let lines = (range.start_line()..=range.end_line())
            .map(|n| doc.line(n))
            .collect::<Result<Vec<_>, _>>()?;
        let items = parse_region(&lines, range);
        tracing::debug!(
            start_line = range.start_line(),
            end_line = range.end_line(),
            entries = items.len(),
            "loaded logbook"
        );
        Ok(Self::new(range, items))
    }

    /// Writes a fresh drawer after `anchor_line` with one running clock.
    ///
    /// The drawer is three lines: `:LOGBOOK:`, the new `CLOCK:` line and
    /// `:END:`, each prefixed with `indent`.
    pub fn create<D: Document + ?Sized>(
        doc: &mut D,
        anchor_line: usize,
        indent: Indent,
        clock: &dyn Clock,
    ) -> Result<Self, LogbookError> {
        let prefix = indent.prefix();
        let start = clock.now();
        doc.append_lines(
            anchor_line,
            vec![
                format!("{prefix}{DRAWER_START}"),
                clock_line(&prefix, start),
                format!("{prefix}{DRAWER_END}"),
            ],
        )?;

        let range = Range::new(anchor_line + 1, anchor_line + 3);
        let entry = LogEntry::new(anchor_line + 2, Interval::open(start));
        tracing::info!(%start, line = entry.line(), "created logbook and clocked in");
        Ok(Self {
            range,
            items: vec![entry],
        })
    }

    pub const fn range(&self) -> Range {
        self.range
    }

    /// Entries in document order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.items
    }

    pub fn get(&self, id: EntryId) -> Option<&LogEntry> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn entry_at_line(&self, line: usize) -> Option<&LogEntry> {
        self.items.iter().find(|e| e.line() == line)
    }

    // ========== Queries ==========

    pub fn is_active(&self) -> bool {
        self.active().is_some()
    }

    /// The first running entry, if any.
    pub fn active(&self) -> Option<&LogEntry> {
        self.items.iter().find(|e| e.is_open())
    }

    fn active_index(&self) -> Option<usize> {
        self.items.iter().position(LogEntry::is_open)
    }

    /// Sum of closed entries' minutes.
    ///
    /// With a window, only entries whose start or end falls inside it count.
    pub fn total_minutes(&self, window: Option<&TimeWindow>) -> i64 {
        self.items
            .iter()
            .filter_map(|entry| {
                let duration = entry.duration()?;
                let in_window = window.is_none_or(|w| {
                    w.contains(entry.start_time())
                        || entry.end_time().is_some_and(|end| w.contains(end))
                });
                in_window.then_some(duration.minutes())
            })
            .sum()
    }

    pub fn total(&self, window: Option<&TimeWindow>) -> Duration {
        Duration::from_minutes(self.total_minutes(window))
    }

    /// Closed total plus the running clock's elapsed time up to now.
    pub fn total_with_active(&self, clock: &dyn Clock) -> Duration {
        let running = self
            .active()
            .map_or(Duration::ZERO, |entry| entry.elapsed(clock.now()));
        self.total(None) + running
    }

    // ========== Mutations ==========

    /// Starts a new clock at the top of the drawer.
    ///
    /// Fails with [`LogbookError::AlreadyClocked`] if a clock is running;
    /// the document is not touched in that case.
    pub fn clock_in<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        clock: &dyn Clock,
    ) -> Result<ClockedIn, LogbookError> {
        if let Some(active) = self.active() {
            return Err(LogbookError::AlreadyClocked {
                since: active.start_time(),
            });
        }

        let indent = leading_indent(doc.line(self.range.start_line())?).to_string();
        let start = clock.now();
        let line = self.range.start_line() + 1;
        doc.append_lines(self.range.start_line(), vec![clock_line(&indent, start)])?;

        self.shift_from(line, 1);
        self.range = self.range.grown();
        let entry = LogEntry::new(line, Interval::open(start));
        let id = entry.id();
        self.items.insert(0, entry);

        tracing::info!(%start, line, "clocked in");
        Ok(ClockedIn { id, start })
    }

    /// Stops the running clock, appending its end and duration to its line.
    ///
    /// Returns `Ok(None)` if nothing is running.
    pub fn clock_out<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        clock: &dyn Clock,
    ) -> Result<Option<ClockedOut>, LogbookError> {
        let Some(idx) = self.active_index() else {
            tracing::debug!("clock out with no running clock");
            return Ok(None);
        };

        let entry = &self.items[idx];
        let line = entry.line();
        let start = entry.start_time();
        let end = clock.now();
        let duration = end - start;

        let text = doc.line(line)?.trim_end().to_string();
        doc.set_line(
            line,
            format!("{text}--{} => {duration}", end.to_wrapped_string()),
        )?;
        self.items[idx].close(end);

        let id = self.items[idx].id();
        tracing::info!(%end, %duration, line, "clocked out");
        Ok(Some(ClockedOut {
            id,
            start,
            end,
            duration,
        }))
    }

    /// Deletes the running clock's line and drops the entry.
    ///
    /// Returns the removed entry, or `Ok(None)` if nothing is running.
    pub fn cancel_active_clock<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
    ) -> Result<Option<LogEntry>, LogbookError> {
        let Some(idx) = self.active_index() else {
            tracing::debug!("cancel with no running clock");
            return Ok(None);
        };

        let line = self.items[idx].line();
        doc.delete_line(line)?;

        let removed = self.items.remove(idx);
        self.shift_from(line + 1, -1);
        self.range = self.range.shrunk();

        tracing::info!(start = %removed.start_time(), line, "cancelled running clock");
        Ok(Some(removed))
    }

    /// Rewrites the `=> H:MM` estimate on `line` from the entry's duration.
    ///
    /// Returns `Ok(false)` if `line` is not a closed entry of this logbook.
    /// The document's view is preserved across the rewrite.
    pub fn recalculate_estimate<D: Document + ?Sized>(
        &self,
        doc: &mut D,
        line: usize,
    ) -> Result<bool, LogbookError> {
        let Some(duration) = self.entry_at_line(line).and_then(LogEntry::duration) else {
            return Ok(false);
        };

        let text = doc.line(line)?;
        let stripped = ESTIMATE_SUFFIX_RE.replace(text, "");
        let updated = format!("{stripped} => {duration}");

        let view = doc.save_view();
        let result = doc.set_line(line, updated);
        doc.restore_view(view);
        result?;

        tracing::debug!(line, %duration, "recalculated estimate");
        Ok(true)
    }

    /// Merges newly parsed entries, keeping document order.
    ///
    /// Each entry must sit on a free line inside the drawer body, and at most
    /// one clock may be running afterwards. On any violation nothing is
    /// merged.
    pub fn append_entries(
        &mut self,
        entries: impl IntoIterator<Item = LogEntry>,
    ) -> Result<(), LogbookError> {
        let entries: Vec<LogEntry> = entries.into_iter().collect();
        let body = self.range.body();
        let mut taken: HashSet<usize> = self.items.iter().map(LogEntry::line).collect();
        for entry in &entries {
            let line = entry.line();
            if !body.contains(&line) {
                return Err(LogbookError::OutsideDrawer {
                    line,
                    first: body.start,
                    last: body.end.saturating_sub(1),
                });
            }
            if !taken.insert(line) {
                return Err(LogbookError::LineTaken { line });
            }
        }

        let mut running = self
            .active()
            .into_iter()
            .chain(entries.iter().filter(|e| e.is_open()));
        if let (Some(_), Some(second)) = (running.next(), running.next()) {
            return Err(LogbookError::AlreadyClocked {
                since: second.start_time(),
            });
        }

        self.items.extend(entries);
        self.items.sort_by_key(LogEntry::line);
        Ok(())
    }

    /// Moves every entry at or below `from` by `delta` lines.
    fn shift_from(&mut self, from: usize, delta: isize) {
        for entry in self.items.iter_mut().filter(|e| e.line() >= from) {
            entry.set_line(entry.line().saturating_add_signed(delta));
        }
    }
}
