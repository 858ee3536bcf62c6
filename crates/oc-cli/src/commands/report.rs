//! Report command for clocked time per heading.
//!
//! Without a window the running clock counts up to now; with `--from`/`--to`
//! only finished entries that start or end inside the window are summed.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use oc_core::{Clock, Document, Duration, TimeWindow, Timestamp};
use serde::Serialize;

use super::util::logbooks;

/// One heading's line in the report.
#[derive(Debug, Serialize)]
pub struct HeadingTotal {
    pub title: String,
    pub line: usize,
    pub minutes: i64,
    pub running: bool,
}

/// Computed report data.
#[derive(Debug, Serialize)]
pub struct ReportData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<TimeWindow>,
    pub headings: Vec<HeadingTotal>,
    pub total_minutes: i64,
}

pub fn build_report<D: Document + ?Sized>(
    doc: &D,
    window: Option<TimeWindow>,
    clock: &dyn Clock,
) -> Result<ReportData> {
    let headings: Vec<HeadingTotal> = logbooks(doc)?
        .into_iter()
        .map(|(heading, logbook)| {
            let total = match &window {
                Some(w) => logbook.total(Some(w)),
                None => logbook.total_with_active(clock),
            };
            HeadingTotal {
                title: heading.title,
                line: heading.line,
                minutes: total.minutes(),
                running: logbook.is_active(),
            }
        })
        .collect();
    let total_minutes = headings.iter().map(|h| h.minutes).sum();

    Ok(ReportData {
        window,
        headings,
        total_minutes,
    })
}

/// Formats the report as an aligned table.
pub fn format_report(data: &ReportData) -> String {
    let mut out = String::new();
    match &data.window {
        Some(w) => {
            let bound =
                |t: Option<Timestamp>| t.map_or_else(|| "...".to_string(), |t| t.to_string());
            let _ = writeln!(out, "Clock report {} to {}", bound(w.from), bound(w.to));
        }
        None => {
            let _ = writeln!(out, "Clock report (all time)");
        }
    }

    if data.headings.is_empty() {
        let _ = writeln!(out, "No clocked time.");
        return out;
    }

    for heading in &data.headings {
        let marker = if heading.running { " *" } else { "" };
        let _ = writeln!(
            out,
            "{:>7}  {}{marker}",
            Duration::from_minutes(heading.minutes),
            heading.title
        );
    }
    let _ = writeln!(out, "{}", "-".repeat(7));
    let _ = writeln!(
        out,
        "{:>7}  Total",
        Duration::from_minutes(data.total_minutes)
    );
    out
}

pub fn run<D, W>(
    writer: &mut W,
    doc: &D,
    window: Option<TimeWindow>,
    clock: &dyn Clock,
    json: bool,
) -> Result<()>
where
    D: Document + ?Sized,
    W: Write,
{
    let data = build_report(doc, window, clock)?;
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&data)?)?;
    } else {
        write!(writer, "{}", format_report(&data))?;
    }
    Ok(())
}
