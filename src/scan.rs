//! Linear walk over the value area.
//!
//! Every read and mutation path starts here: the walk decodes one record
//! header at a time, measures it, and steps to the next. The first record
//! matching the requested id is captured, but the walk always continues
//! to the end of the value area so the terminal offset is known to the
//! caller as well. Nothing is cached between calls.

use crate::error::TagBufError;
use crate::header::HEADER_SIZE;
use crate::record::{self, RecordHead};

/// A record located by a scan: its decoded header and the byte range it
/// occupies within the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FoundRecord {
    pub head: RecordHead,
    /// Offset of the record's first byte.
    pub start: usize,
    /// Offset one past the record's last byte.
    pub end: usize,
}

/// Result of a full walk: the first match, if any, and the terminal
/// offset one past the last record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanOutcome {
    pub found: Option<FoundRecord>,
    pub end: usize,
}

/// Walks the whole value area looking for `id`. O(n) in record count,
/// single pass. A record whose declared length runs past the declared
/// value-area size is corruption, reported as `ScanError`.
pub(crate) fn scan(buf: &[u8], vals_size: usize, id: u16) -> Result<ScanOutcome, TagBufError> {
    let limit = HEADER_SIZE + vals_size;
    let mut pos = HEADER_SIZE;
    let mut found = None;

    while pos < limit {
        let head = record::decode_head(buf, pos, limit)?;
        let end = pos + head.total_len();
        if found.is_none() && head.id == id {
            // first match wins; keep walking to the end regardless
            found = Some(FoundRecord {
                head,
                start: pos,
                end,
            });
        }
        pos = end;
    }

    Ok(ScanOutcome { found, end: pos })
}
