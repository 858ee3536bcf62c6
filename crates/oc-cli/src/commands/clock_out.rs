//! Out command: stop the running clock.

use std::io::Write;

use anyhow::Result;
use oc_core::{Clock, Document};

use super::util::find_active;

pub fn run<D, W>(writer: &mut W, doc: &mut D, clock: &dyn Clock) -> Result<()>
where
    D: Document + ?Sized,
    W: Write,
{
    let Some((heading, mut logbook)) = find_active(doc)? else {
        writeln!(writer, "No clock is running.")?;
        return Ok(());
    };

    if let Some(out) = logbook.clock_out(doc, clock)? {
        writeln!(
            writer,
            "Clocked out of {:?} at {} ({})",
            heading.title, out.end, out.duration
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use oc_core::{FixedClock, TextBuffer, Timestamp};

    #[test]
    fn closes_running_clock() {
        let mut doc = TextBuffer::from(
            "* Idle\n* Busy\n:LOGBOOK:\nCLOCK: [2023-01-02 Mon 09:00]\n:END:\n",
        );
        let clock = FixedClock::new(Timestamp::from_ymd_hm(2023, 1, 2, 10, 15).unwrap());
        let mut output = Vec::new();

        run(&mut output, &mut doc, &clock).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r#"Clocked out of "Busy" at [2023-01-02 Mon 10:15] (1:15)"#);
        assert_eq!(
            doc.line(4).unwrap(),
            "CLOCK: [2023-01-02 Mon 09:00]--[2023-01-02 Mon 10:15] => 1:15"
        );
    }

    #[test]
    fn nothing_running_leaves_file_alone() {
        let original = "* Task\n:LOGBOOK:\nCLOCK: [2023-01-01 Sun 10:00]--[2023-01-01 Sun 11:00] => 1:00\n:END:\n";
        let mut doc = TextBuffer::from(original);
        let clock = FixedClock::new(Timestamp::from_ymd_hm(2023, 1, 2, 10, 15).unwrap());
        let mut output = Vec::new();

        run(&mut output, &mut doc, &clock).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @"No clock is running.");
        assert_eq!(doc.to_string(), original);
    }
}
