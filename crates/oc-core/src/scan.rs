//! Extraction of bracketed timestamps from document text.

use serde::Serialize;

use crate::timestamp::{SCAN_RE, Timestamp};

/// A timestamp found in the document, tagged with the line it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimestampToken {
    pub timestamp: Timestamp,
    /// 1-based document line.
    pub line: usize,
}

impl TimestampToken {
    pub const fn new(timestamp: Timestamp, line: usize) -> Self {
        Self { timestamp, line }
    }
}

/// Scans `lines` for `[...]` timestamps.
///
/// `first_line` is the document line number of the first item in `lines`.
/// Tokens come back in document order; within a line, left to right.
/// Bracketed text that looks like a timestamp but names an impossible date
/// is skipped.
pub fn scan_timestamps<I, S>(lines: I, first_line: usize) -> Vec<TimestampToken>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tokens = Vec::new();
    for (offset, text) in lines.into_iter().enumerate() {
        let line = first_line + offset;
        for caps in SCAN_RE.captures_iter(text.as_ref()) {
            match Timestamp::from_captures(&caps) {
                Some(timestamp) => tokens.push(TimestampToken { timestamp, line }),
                None => {
                    tracing::trace!(line, text = &caps[0], "skipping out-of-range timestamp");
                }
            }
        }
    }
    tokens
}
