//! Shared utilities for CLI commands.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use oc_core::outline::{self, Heading};
use oc_core::{Document, Logbook, TextBuffer};

/// An org file opened for a read-modify-write cycle.
///
/// The file stays exclusively locked until the value is dropped, so two
/// `oc` invocations cannot interleave their edits.
pub struct OrgFile {
    path: PathBuf,
    file: File,
    pub buffer: TextBuffer,
}

impl OrgFile {
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        file.lock_exclusive()
            .with_context(|| format!("failed to lock {}", path.display()))?;

        let mut text = String::new();
        file.read_to_string(&mut text)
            .with_context(|| format!("failed to read {}", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "opened org file");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            buffer: TextBuffer::from(text.as_str()),
        })
    }

    /// Writes the buffer back in place and releases the lock.
    ///
    /// The new text is written over the old before the file is cut to
    /// length, so a failed write never leaves it empty.
    pub fn save(mut self) -> Result<()> {
        let text = self.buffer.to_string();
        let len = u64::try_from(text.len())?;
        self.file
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.file.write_all(text.as_bytes()))
            .and_then(|()| self.file.set_len(len))
            .and_then(|()| self.file.sync_all())
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "saved org file");
        Ok(())
    }
}

/// Reads an org file under a shared lock.
pub fn read_org_file(path: &Path) -> Result<TextBuffer> {
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    file.lock_shared()
        .with_context(|| format!("failed to lock {}", path.display()))?;
    let mut text = String::new();
    file.read_to_string(&mut text)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(TextBuffer::from(text.as_str()))
}

/// Every heading that has a logbook drawer, with the parsed logbook.
pub fn logbooks<D: Document + ?Sized>(doc: &D) -> Result<Vec<(Heading, Logbook)>> {
    let mut found = Vec::new();
    for heading in outline::headings(doc)? {
        if let Some(range) = outline::find_logbook(doc, &heading)? {
            let logbook = Logbook::load(doc, range)
                .with_context(|| format!("failed to read logbook of {:?}", heading.title))?;
            found.push((heading, logbook));
        }
    }
    Ok(found)
}

/// The heading and logbook holding the running clock, if any.
pub fn find_active<D: Document + ?Sized>(doc: &D) -> Result<Option<(Heading, Logbook)>> {
    Ok(logbooks(doc)?
        .into_iter()
        .find(|(_, logbook)| logbook.is_active()))
}
