//! Parsing of `CLOCK:` lines inside a logbook drawer.
//!
//! Parsing is permissive. The drawer may have been edited by hand, so lines
//! that are not clock lines, or clock lines without a usable timestamp, are
//! dropped rather than reported.

use crate::entry::{Interval, LogEntry};
use crate::range::Range;
use crate::scan::{TimestampToken, scan_timestamps};

const CLOCK_KEY: &str = "CLOCK";

/// Returns the property-style key of a line: the text before the first colon.
fn line_key(line: &str) -> Option<&str> {
    line.split_once(':').map(|(key, _)| key.trim())
}

fn is_clock_line(line: &str) -> bool {
    line_key(line).is_some_and(|key| key.eq_ignore_ascii_case(CLOCK_KEY))
}

/// Turns the lines of a logbook region into entries.
///
/// `lines` spans the whole region, delimiters included, so `lines[0]` is the
/// document line `range.start_line()`. Each clock line takes its timestamps
/// from the `tokens` recorded for the same document line: the first is the
/// start, the second (if any) the end.
pub fn parse_clock_lines<S: AsRef<str>>(
    lines: &[S],
    range: Range,
    tokens: &[TimestampToken],
) -> Vec<LogEntry> {
    if lines.len() < 2 {
        return Vec::new();
    }

    let mut entries = Vec::new();
    for (idx, text) in lines[1..lines.len() - 1].iter().enumerate() {
        let text = text.as_ref();
        if !is_clock_line(text) {
            continue;
        }

        let line = range.start_line() + idx + 1;
        let mut stamps = tokens
            .iter()
            .filter(|t| t.line == line)
            .map(|t| t.timestamp);

        let Some(start) = stamps.next() else {
            tracing::trace!(line, text, "skipping clock line without timestamps");
            continue;
        };
        let interval = match stamps.next() {
            Some(end) => Interval::closed(start, end),
            None => Interval::open(start),
        };
        entries.push(LogEntry::new(line, interval));
    }
    entries
}

/// Parses a region, scanning its timestamps first.
pub fn parse_region<S: AsRef<str>>(lines: &[S], range: Range) -> Vec<LogEntry> {
    let tokens = scan_timestamps(lines, range.start_line());
    parse_clock_lines(lines, range, &tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::Duration;
    use crate::timestamp::Timestamp;

    fn ts(hour: u32, minute: u32) -> Timestamp {
        Timestamp::from_ymd_hm(2023, 1, 1, hour, minute).unwrap()
    }

    #[test]
    fn parses_open_and_closed_entries_in_line_order() {
        let lines = [
            ":LOGBOOK:",
            "CLOCK: [2023-01-01 09:00]",
            "CLOCK: [2023-01-01 10:00]--[2023-01-01 11:30] => 1:30",
            ":END:",
        ];
        let range = Range::new(10, 13);
        let tokens = [
            TimestampToken::new(ts(9, 0), 11),
            TimestampToken::new(ts(10, 0), 12),
            TimestampToken::new(ts(11, 30), 12),
        ];

        let entries = parse_clock_lines(&lines, range, &tokens);

        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_open());
        assert_eq!(entries[0].start_time(), ts(9, 0));
        assert_eq!(entries[0].line(), 11);
        assert_eq!(entries[1].end_time(), Some(ts(11, 30)));
        assert_eq!(entries[1].duration(), Some(Duration::from_minutes(90)));
        assert_eq!(entries[1].line(), 12);
    }

    #[test]
    fn skips_non_clock_lines_and_lines_without_tokens() {
        let lines = [
            ":LOGBOOK:",
            "- State \"DONE\" from \"TODO\" [2023-01-01 12:00]",
            "CLOCK:",
            "clock: [2023-01-01 13:00]--[2023-01-01 13:15] =>  0:15",
            "no colon here",
            ":END:",
        ];
        let range = Range::new(1, 6);
        let tokens = [
            TimestampToken::new(ts(12, 0), 2),
            TimestampToken::new(ts(13, 0), 4),
            TimestampToken::new(ts(13, 15), 4),
        ];

        let entries = parse_clock_lines(&lines, range, &tokens);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].line(), 4);
        assert_eq!(entries[0].duration(), Some(Duration::from_minutes(15)));
    }

    #[test]
    fn ignores_delimiters_even_if_they_look_like_clock_lines() {
        let lines = ["CLOCK: [2023-01-01 09:00]", "CLOCK: [2023-01-01 10:00]"];
        let range = Range::new(1, 2);
        let tokens = [
            TimestampToken::new(ts(9, 0), 1),
            TimestampToken::new(ts(10, 0), 2),
        ];
        assert!(parse_clock_lines(&lines, range, &tokens).is_empty());
    }

    #[test]
    fn too_few_lines_yield_nothing() {
        let empty: [&str; 0] = [];
        assert!(parse_clock_lines(&empty, Range::new(1, 1), &[]).is_empty());
        assert!(parse_clock_lines(&[":LOGBOOK:"], Range::new(1, 1), &[]).is_empty());
    }

    #[test]
    fn extra_tokens_on_a_line_are_ignored() {
        let lines = [
            ":LOGBOOK:",
            "CLOCK: [2023-01-01 09:00]--[2023-01-01 09:30] [2023-01-01 10:00]",
            ":END:",
        ];
        let entries = parse_region(&lines, Range::new(1, 3));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].end_time(), Some(ts(9, 30)));
    }

    #[test]
    fn parse_region_scans_its_own_tokens() {
        let lines = vec![
            "  :LOGBOOK:".to_string(),
            "  CLOCK: [2023-01-01 Sun 14:00]--[2023-01-01 Sun 16:05] =>  2:05".to_string(),
            "  CLOCK: [2023-01-01 Sun 17:00]".to_string(),
            "  :END:".to_string(),
        ];
        let entries = parse_region(&lines, Range::new(7, 10));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].line(), 8);
        assert_eq!(entries[0].duration(), Some(Duration::from_minutes(125)));
        assert_eq!(entries[1].line(), 9);
        assert!(entries[1].is_open());
    }
}
