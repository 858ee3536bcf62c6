//! Just enough org outline structure to find where a logbook lives.

use serde::{Deserialize, Serialize};

use crate::document::{Document, DocumentError};
use crate::logbook::{DRAWER_END, DRAWER_START, Indent};
use crate::range::Range;

const PROPERTIES_START: &str = ":PROPERTIES:";
const PLANNING_KEYWORDS: [&str; 3] = ["SCHEDULED:", "DEADLINE:", "CLOSED:"];

/// An org heading line such as `** TODO Write parser`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub line: usize,
    pub level: usize,
    pub title: String,
}

/// How new logbook drawers are indented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentPolicy {
    /// Drawers start at column zero.
    #[default]
    Flat,
    /// Drawers are indented to line up with the heading's text.
    Nested,
}

impl IndentPolicy {
    pub const fn indent_for(self, heading: &Heading) -> Indent {
        match self {
            Self::Flat => Indent::Flat,
            Self::Nested => Indent::Depth(heading.level + 1),
        }
    }
}

fn parse_heading(line: usize, text: &str) -> Option<Heading> {
    let level = text.chars().take_while(|&c| c == '*').count();
    if level == 0 {
        return None;
    }
    let rest = &text[level..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    Some(Heading {
        line,
        level,
        title: rest.trim().to_string(),
    })
}

fn is_planning_line(text: &str) -> bool {
    let text = text.trim_start();
    PLANNING_KEYWORDS.iter().any(|kw| text.starts_with(kw))
}

fn is_delimiter(text: &str, delimiter: &str) -> bool {
    text.trim().eq_ignore_ascii_case(delimiter)
}

/// All headings in document order.
pub fn headings<D: Document + ?Sized>(doc: &D) -> Result<Vec<Heading>, DocumentError> {
    let mut found = Vec::new();
    for n in 1..=doc.line_count() {
        if let Some(heading) = parse_heading(n, doc.line(n)?) {
            found.push(heading);
        }
    }
    Ok(found)
}

/// The heading whose section contains `line`, if any.
pub fn heading_at<D: Document + ?Sized>(
    doc: &D,
    line: usize,
) -> Result<Option<Heading>, DocumentError> {
    // Validates `line`.
    doc.line(line)?;
    for n in (1..=line).rev() {
        if let Some(heading) = parse_heading(n, doc.line(n)?) {
            return Ok(Some(heading));
        }
    }
    Ok(None)
}

/// Last line of the heading's own text, before the next heading of any level.
pub fn section_end<D: Document + ?Sized>(
    doc: &D,
    heading: &Heading,
) -> Result<usize, DocumentError> {
    for n in heading.line + 1..=doc.line_count() {
        if parse_heading(n, doc.line(n)?).is_some() {
            return Ok(n - 1);
        }
    }
    Ok(doc.line_count())
}

/// Finds the first line in `from..=to` equal to `delimiter`.
fn find_delimiter<D: Document + ?Sized>(
    doc: &D,
    from: usize,
    to: usize,
    delimiter: &str,
) -> Result<Option<usize>, DocumentError> {
    for n in from..=to {
        if is_delimiter(doc.line(n)?, delimiter) {
            return Ok(Some(n));
        }
    }
    Ok(None)
}

/// The first complete logbook drawer in the heading's own section.
pub fn find_logbook<D: Document + ?Sized>(
    doc: &D,
    heading: &Heading,
) -> Result<Option<Range>, DocumentError> {
    let end = section_end(doc, heading)?;
    let Some(start) = find_delimiter(doc, heading.line + 1, end, DRAWER_START)? else {
        return Ok(None);
    };
    let Some(close) = find_delimiter(doc, start + 1, end, DRAWER_END)? else {
        tracing::warn!(line = start, "logbook drawer is not closed");
        return Ok(None);
    };
    Ok(Some(Range::new(start, close)))
}

/// The line after which a new logbook drawer belongs.
///
/// That is the end of a property drawer directly under the heading (or under
/// its planning line), else the planning line, else the heading itself.
pub fn logbook_anchor<D: Document + ?Sized>(
    doc: &D,
    heading: &Heading,
) -> Result<usize, DocumentError> {
    let end = section_end(doc, heading)?;
    let mut anchor = heading.line;

    if anchor < end && is_planning_line(doc.line(anchor + 1)?) {
        anchor += 1;
    }
    if anchor < end && is_delimiter(doc.line(anchor + 1)?, PROPERTIES_START) {
        if let Some(close) = find_delimiter(doc, anchor + 2, end, DRAWER_END)? {
            anchor = close;
        }
    }
    Ok(anchor)
}
