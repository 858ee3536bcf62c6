//! Recalc command: refresh a clock line's `=> H:MM` estimate.
//!
//! Useful after editing a timestamp by hand. The logbook is re-read from the
//! file, so the duration comes from the timestamps as they are now.

use std::io::Write;

use anyhow::{Context, Result};
use oc_core::outline;
use oc_core::{Document, Logbook};

pub fn run<D, W>(writer: &mut W, doc: &mut D, line: usize) -> Result<()>
where
    D: Document + ?Sized,
    W: Write,
{
    let heading = outline::heading_at(doc, line)?
        .with_context(|| format!("line {line} is not under a heading"))?;
    let range = outline::find_logbook(doc, &heading)?
        .filter(|range| range.contains(line))
        .with_context(|| format!("line {line} is not inside a logbook"))?;

    let logbook = Logbook::load(doc, range)?;
    if logbook.recalculate_estimate(doc, line)? {
        writeln!(writer, "Updated line {line}: {}", doc.line(line)?.trim())?;
    } else {
        writeln!(writer, "Line {line} is not a finished clock entry.")?;
    }
    Ok(())
}
