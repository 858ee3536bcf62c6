//! Clock logbook engine for org documents.
//!
//! This crate keeps `CLOCK:` lines inside a `:LOGBOOK:` drawer in sync with
//! an in-memory model of tracked intervals:
//! - Parsing: turning drawer lines and their timestamps into entries
//! - Queries: the running clock and (windowed) totals
//! - Mutations: clock in, clock out, cancel and estimate refresh, each
//!   editing the document through the [`Document`] port

mod clock;
mod document;
mod duration;
mod entry;
pub mod logbook;
pub mod outline;
pub mod parser;
mod range;
mod scan;
mod timestamp;

pub use clock::{Clock, FixedClock, SystemClock};
pub use document::{Document, DocumentError, TextBuffer, View};
pub use duration::{Duration, DurationError};
pub use entry::{EntryId, Interval, LogEntry};
pub use logbook::{ClockedIn, ClockedOut, Indent, Logbook, LogbookError};
pub use outline::{Heading, IndentPolicy};
pub use range::Range;
pub use scan::{TimestampToken, scan_timestamps};
pub use timestamp::{TimeWindow, Timestamp, TimestampError};
