//! Clock entries: one tracked interval each.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::duration::Duration;
use crate::timestamp::Timestamp;

/// Stable identifier for a [`LogEntry`].
///
/// Line numbers change as the document is edited; the ID does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The state of an interval.
///
/// An interval is closed exactly when it has an end, and a closed interval
/// always carries the duration computed from its two timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Interval {
    /// Still running.
    Open { start: Timestamp },
    /// Finished.
    Closed {
        start: Timestamp,
        end: Timestamp,
        duration: Duration,
    },
}

impl Interval {
    pub const fn open(start: Timestamp) -> Self {
        Self::Open { start }
    }

    pub fn closed(start: Timestamp, end: Timestamp) -> Self {
        Self::Closed {
            start,
            end,
            duration: end - start,
        }
    }

    pub const fn start(&self) -> Timestamp {
        match self {
            Self::Open { start } | Self::Closed { start, .. } => *start,
        }
    }

    pub const fn end(&self) -> Option<Timestamp> {
        match self {
            Self::Open { .. } => None,
            Self::Closed { end, .. } => Some(*end),
        }
    }

    pub const fn duration(&self) -> Option<Duration> {
        match self {
            Self::Open { .. } => None,
            Self::Closed { duration, .. } => Some(*duration),
        }
    }

    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

/// One clock line of a logbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    id: EntryId,
    /// Current 1-based document line of the entry's `CLOCK:` line.
    line: usize,
    #[serde(flatten)]
    interval: Interval,
}

impl LogEntry {
    pub fn new(line: usize, interval: Interval) -> Self {
        Self {
            id: EntryId::new(),
            line,
            interval,
        }
    }

    pub const fn id(&self) -> EntryId {
        self.id
    }

    pub const fn line(&self) -> usize {
        self.line
    }

    pub const fn interval(&self) -> &Interval {
        &self.interval
    }

    pub const fn start_time(&self) -> Timestamp {
        self.interval.start()
    }

    pub const fn end_time(&self) -> Option<Timestamp> {
        self.interval.end()
    }

    pub const fn duration(&self) -> Option<Duration> {
        self.interval.duration()
    }

    pub const fn is_open(&self) -> bool {
        self.interval.is_open()
    }

    /// Time elapsed from the start until `now`, or the stored duration if closed.
    pub fn elapsed(&self, now: Timestamp) -> Duration {
        self.duration().unwrap_or_else(|| now - self.start_time())
    }

    pub(crate) const fn set_line(&mut self, line: usize) {
        self.line = line;
    }

    /// Transitions an open entry to closed. Returns `None` if already closed.
    pub(crate) fn close(&mut self, end: Timestamp) -> Option<Duration> {
        let Interval::Open { start } = self.interval else {
            return None;
        };
        self.interval = Interval::closed(start, end);
        self.interval.duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(hour: u32, minute: u32) -> Timestamp {
        Timestamp::from_ymd_hm(2023, 1, 1, hour, minute).unwrap()
    }

    #[test]
    fn closed_interval_computes_duration() {
        let interval = Interval::closed(ts(10, 0), ts(11, 30));
        assert_eq!(interval.duration(), Some(Duration::from_minutes(90)));
        assert_eq!(interval.end(), Some(ts(11, 30)));
        assert!(!interval.is_open());
    }

    #[test]
    fn open_interval_has_no_end_or_duration() {
        let interval = Interval::open(ts(9, 0));
        assert_eq!(interval.start(), ts(9, 0));
        assert_eq!(interval.end(), None);
        assert_eq!(interval.duration(), None);
        assert!(interval.is_open());
    }

    #[test]
    fn close_transitions_exactly_once() {
        let mut entry = LogEntry::new(3, Interval::open(ts(9, 0)));
        assert_eq!(entry.close(ts(9, 45)), Some(Duration::from_minutes(45)));
        assert_eq!(entry.end_time(), Some(ts(9, 45)));

        assert_eq!(entry.close(ts(10, 0)), None);
        assert_eq!(entry.end_time(), Some(ts(9, 45)));
    }

    #[test]
    fn elapsed_uses_now_only_while_open() {
        let open = LogEntry::new(1, Interval::open(ts(9, 0)));
        assert_eq!(open.elapsed(ts(9, 20)).minutes(), 20);

        let closed = LogEntry::new(2, Interval::closed(ts(9, 0), ts(9, 10)));
        assert_eq!(closed.elapsed(ts(12, 0)).minutes(), 10);
    }

    #[test]
    fn entries_get_distinct_ids() {
        let a = LogEntry::new(1, Interval::open(ts(9, 0)));
        let b = LogEntry::new(1, Interval::open(ts(9, 0)));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn entry_serializes_flat() {
        let entry = LogEntry::new(4, Interval::closed(ts(10, 0), ts(11, 30)));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["state"], "closed");
        assert_eq!(value["line"], 4);
        assert_eq!(value["duration"], 90);
    }
}
