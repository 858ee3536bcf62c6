//! In command: start a clock on a heading.

use std::io::Write;

use anyhow::{Context, Result};
use oc_core::outline;
use oc_core::{Clock, Document, IndentPolicy, Logbook};

use super::util::find_active;

/// Clocks in on the heading owning `line`, creating its logbook if needed.
///
/// Only one clock may run per file; clock out (or cancel) first.
pub fn run<D, W>(
    writer: &mut W,
    doc: &mut D,
    line: usize,
    indent: IndentPolicy,
    clock: &dyn Clock,
) -> Result<()>
where
    D: Document + ?Sized,
    W: Write,
{
    let heading = outline::heading_at(doc, line)?
        .with_context(|| format!("line {line} is not under a heading"))?;

    if let Some((running, logbook)) = find_active(doc)? {
        let since = logbook.active().map(|e| e.start_time().to_string());
        anyhow::bail!(
            "already clocked in on {:?} since {}; run `oc out` first",
            running.title,
            since.unwrap_or_default()
        );
    }

    let start = match outline::find_logbook(doc, &heading)? {
        Some(range) => {
            let mut logbook = Logbook::load(doc, range)?;
            logbook.clock_in(doc, clock)?.start
        }
        None => {
            let anchor = outline::logbook_anchor(doc, &heading)?;
            let logbook = Logbook::create(doc, anchor, indent.indent_for(&heading), clock)?;
            logbook
                .active()
                .map(|e| e.start_time())
                .context("new logbook has no running clock")?
        }
    };

    writeln!(writer, "Clocked in on {:?} at {start}", heading.title)?;
    Ok(())
}
