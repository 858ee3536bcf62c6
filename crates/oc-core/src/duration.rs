//! Signed elapsed time in whole minutes.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a `H:MM` string cannot be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid duration: {value} (expected H:MM)")]
pub struct DurationError {
    value: String,
}

/// Elapsed time with minute resolution.
///
/// Renders as `H:MM`; hours are not wrapped at 24 and negative values keep
/// their sign (`-0:30`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Duration(i64);

impl Duration {
    pub const ZERO: Self = Self(0);

    /// Converts a second count, truncating toward zero.
    pub const fn from_seconds(seconds: i64) -> Self {
        Self(seconds / 60)
    }

    pub const fn from_minutes(minutes: i64) -> Self {
        Self(minutes)
    }

    pub const fn minutes(self) -> i64 {
        self.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let total = self.0.unsigned_abs();
        f.pad(&format!("{sign}{}:{:02}", total / 60, total % 60))
    }
}

impl FromStr for Duration {
    type Err = DurationError;

    /// Parses `[+-]?H:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DurationError {
            value: s.to_string(),
        };
        let trimmed = s.trim();
        let (negative, body) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let (hours, minutes) = body.split_once(':').ok_or_else(invalid)?;
        if hours.is_empty() || minutes.len() != 2 {
            return Err(invalid());
        }
        let hours: i64 = hours.parse().map_err(|_| invalid())?;
        let minutes: i64 = minutes.parse().map_err(|_| invalid())?;
        if minutes >= 60 || hours < 0 {
            return Err(invalid());
        }
        let total = hours * 60 + minutes;
        Ok(Self(if negative { -total } else { total }))
    }
}
