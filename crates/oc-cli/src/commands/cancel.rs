//! Cancel command: drop the running clock without recording it.

use std::io::Write;

use anyhow::Result;
use oc_core::Document;

use super::util::find_active;

pub fn run<D, W>(writer: &mut W, doc: &mut D) -> Result<()>
where
    D: Document + ?Sized,
    W: Write,
{
    let Some((heading, mut logbook)) = find_active(doc)? else {
        writeln!(writer, "No clock is running.")?;
        return Ok(());
    };

    if let Some(removed) = logbook.cancel_active_clock(doc)? {
        writeln!(
            writer,
            "Cancelled clock on {:?} started {}",
            heading.title,
            removed.start_time()
        )?;
    }
    Ok(())
}
