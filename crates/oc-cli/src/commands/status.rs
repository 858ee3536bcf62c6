//! Status command for showing the running clock.

use std::io::Write;

use anyhow::Result;
use oc_core::{Clock, Document, Timestamp};
use serde::Serialize;

use super::util::find_active;

/// JSON shape of `oc status --json`.
#[derive(Debug, Serialize)]
struct StatusJson {
    running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_minutes: Option<i64>,
    /// Running time plus everything already logged under the heading.
    #[serde(skip_serializing_if = "Option::is_none")]
    total_minutes: Option<i64>,
}

pub fn run<D, W>(writer: &mut W, doc: &D, clock: &dyn Clock, json: bool) -> Result<()>
where
    D: Document + ?Sized,
    W: Write,
{
    let active = find_active(doc)?;
    let running = active.as_ref().and_then(|(heading, logbook)| {
        let entry = logbook.active()?;
        Some((
            heading,
            entry,
            entry.elapsed(clock.now()),
            logbook.total_with_active(clock),
        ))
    });

    if json {
        let status = match running {
            Some((heading, entry, elapsed, total)) => StatusJson {
                running: true,
                heading: Some(heading.title.clone()),
                line: Some(entry.line()),
                start: Some(entry.start_time()),
                elapsed_minutes: Some(elapsed.minutes()),
                total_minutes: Some(total.minutes()),
            },
            None => StatusJson {
                running: false,
                heading: None,
                line: None,
                start: None,
                elapsed_minutes: None,
                total_minutes: None,
            },
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&status)?)?;
        return Ok(());
    }

    match running {
        Some((heading, entry, elapsed, total)) => {
            writeln!(writer, "Clocked in on {:?} (line {})", heading.title, entry.line())?;
            writeln!(writer, "Since:   {}", entry.start_time())?;
            writeln!(writer, "Elapsed: {elapsed}")?;
            writeln!(writer, "Total:   {total}")?;
        }
        None => writeln!(writer, "No clock is running.")?,
    }
    Ok(())
}
