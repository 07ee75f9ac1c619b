//! Transcript file reading
//!
//! Whole-file reads for CSV export, tail-limited reads for terminal preview
//! so multi-gigabyte transcripts never have to be loaded fully.

use crate::Result;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// How many bytes of the file tail are read in preview mode.
pub const TAIL_BYTES: u64 = 1_000_000;

/// Read a transcript file and split it into lines.
///
/// With `tail` set, only the last [`TAIL_BYTES`] of the file are read; the
/// first line after a nonzero seek is dropped because the seek usually lands
/// mid-record. When the offset lands exactly on a line start that line is
/// dropped too, so a tail read can lose one wanted row near the boundary.
///
/// Invalid UTF-8 is replaced, never fatal. Leading and trailing whitespace
/// around the whole payload is trimmed before splitting, so an empty file
/// yields a single empty line (which decodes to zero rows downstream).
pub fn read_lines(path: &Path, tail: bool) -> Result<Vec<String>> {
    let mut file = File::open(path)?;

    let mut dropped_partial = false;
    if tail {
        let size = file.seek(SeekFrom::End(0))?;
        let offset = size.saturating_sub(TAIL_BYTES);
        file.seek(SeekFrom::Start(offset))?;
        dropped_partial = offset > 0;
    }

    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;

    let data = String::from_utf8_lossy(&buffer);
    let mut lines: Vec<String> = data.trim().split('\n').map(|l| l.to_string()).collect();
    if dropped_partial {
        lines.remove(0);
    }

    Ok(lines)
}
