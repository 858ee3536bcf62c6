//! Minute-resolution timestamps as written in org documents.
//!
//! Timestamps are naive local wall-clock values. Time zones are not
//! modeled; whatever the document says is taken at face value.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duration::Duration;

/// Inner timestamp pattern shared by parsing and scanning.
///
/// Accepts `2023-01-01`, `2023-01-01 09:00` and `2023-01-01 Sun 09:00`.
/// The day name is ignored.
const TIMESTAMP_BODY: &str = r"(\d{4})-(\d{2})-(\d{2})(?:\s+[^\d\s\]]+)?(?:\s+(\d{1,2}):(\d{2}))?";

static WRAPPED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^\[{TIMESTAMP_BODY}\]$")).unwrap());

/// Unanchored pattern used when scanning free text for timestamps.
pub(crate) static SCAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\[{TIMESTAMP_BODY}\]")).unwrap());

/// Errors from parsing timestamps.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// The text does not look like a timestamp at all.
    #[error("invalid timestamp: {value}")]
    Malformed { value: String },

    /// The text has the right shape but names a date or time that does not exist.
    #[error("timestamp out of range: {value}")]
    OutOfRange { value: String },
}

/// A point in time with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Creates a timestamp, dropping seconds and sub-second precision.
    pub fn new(datetime: NaiveDateTime) -> Self {
        let truncated = datetime
            .with_second(0)
            .and_then(|dt| dt.with_nanosecond(0))
            .unwrap_or(datetime);
        Self(truncated)
    }

    /// Creates a timestamp from calendar parts.
    ///
    /// Returns `None` if the parts do not name a valid date and time.
    pub fn from_ymd_hm(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
        Some(Self(date.and_time(time)))
    }

    /// Returns the underlying date-time.
    pub const fn datetime(self) -> NaiveDateTime {
        self.0
    }

    /// Inclusive range test: `from <= self <= to`.
    pub fn is_between(self, from: Self, to: Self) -> bool {
        from <= self && self <= to
    }

    /// Returns this timestamp shifted by a (possibly negative) duration.
    #[must_use]
    pub fn add_duration(self, duration: Duration) -> Self {
        Self(self.0 + chrono::Duration::minutes(duration.minutes()))
    }

    /// Renders the bracketed form used in clock lines, e.g. `[2023-01-01 Sun 09:00]`.
    pub fn to_wrapped_string(self) -> String {
        format!("[{}]", self.0.format("%Y-%m-%d %a %H:%M"))
    }

    /// Parses the bracketed form produced by [`Timestamp::to_wrapped_string`].
    pub fn parse_wrapped(s: &str) -> Result<Self, TimestampError> {
        let caps = WRAPPED_RE
            .captures(s.trim())
            .ok_or_else(|| TimestampError::Malformed {
                value: s.to_string(),
            })?;
        Self::from_captures(&caps).ok_or_else(|| TimestampError::OutOfRange {
            value: s.to_string(),
        })
    }

    /// Builds a timestamp from a match of [`SCAN_RE`] or `WRAPPED_RE`.
    pub(crate) fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

        let year = caps.get(1)?.as_str().parse().ok()?;
        let (hour, minute) = match (part(4), part(5)) {
            (Some(h), Some(m)) => (h, m),
            _ => (0, 0),
        };
        Self::from_ymd_hm(year, part(2)?, part(3)?, hour, minute)
    }
}

impl std::ops::Sub for Timestamp {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        Duration::from_seconds((self.0 - rhs.0).num_seconds())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wrapped_string())
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    /// Parses a timestamp with or without the surrounding brackets.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with('[') {
            Self::parse_wrapped(trimmed)
        } else {
            Self::parse_wrapped(&format!("[{trimmed}]")).map_err(|e| match e {
                TimestampError::Malformed { .. } => TimestampError::Malformed {
                    value: s.to_string(),
                },
                TimestampError::OutOfRange { .. } => TimestampError::OutOfRange {
                    value: s.to_string(),
                },
            })
        }
    }
}

/// An inclusive window used to restrict totals.
///
/// Either bound may be missing; a window with no `to` runs from `from` on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Timestamp>,
}

impl TimeWindow {
    /// A window closed at both ends.
    pub const fn new(from: Timestamp, to: Timestamp) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub const fn bounded(from: Option<Timestamp>, to: Option<Timestamp>) -> Self {
        Self { from, to }
    }

    pub const fn since(from: Timestamp) -> Self {
        Self::bounded(Some(from), None)
    }

    pub const fn until(to: Timestamp) -> Self {
        Self::bounded(None, Some(to))
    }

    pub fn contains(&self, timestamp: Timestamp) -> bool {
        self.from.is_none_or(|from| from <= timestamp)
            && self.to.is_none_or(|to| timestamp <= to)
    }
}
