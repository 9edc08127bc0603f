//! Byte layout of a single record and its (de)serialization.
//!
//! A record is packed with no padding:
//!
//! ```text
//! id(2 LE) | tag(1) [| blob_len(2 LE) if Blob] [| count(2 LE) if array] | payload
//! ```
//!
//! The tag byte is the base type with [`ARRAY_FLAG`] or-ed in when the
//! element count differs from 1. Structs cannot overlay this layout
//! because field alignment varies across targets; every field is read
//! and written byte-wise at a computed offset.

use crate::error::TagBufError;
use crate::types::BaseType;

pub(crate) const ID_LEN: usize = 2;
pub(crate) const TAG_LEN: usize = 1;
/// Width of both the blob-length and element-count fields.
pub(crate) const LEN_FIELD_LEN: usize = 2;

/// Tag bit marking a record that carries an explicit element count.
pub(crate) const ARRAY_FLAG: u8 = 0x80;

/// Largest encoded record the 16-bit length fields can describe.
pub(crate) const MAX_RECORD_LEN: usize = u16::MAX as usize;

/// Decoded record header: everything before the payload, plus the
/// derived sizes needed to step over or copy the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecordHead {
    pub id: u16,
    pub base: BaseType,
    pub elem_size: u16,
    pub elem_count: u16,
    /// Bytes occupied by id, tag, and any length/count fields.
    pub head_len: usize,
}

impl RecordHead {
    pub(crate) fn payload_len(&self) -> usize {
        self.elem_size as usize * self.elem_count as usize
    }

    /// Bytes the whole record occupies; used to advance a scan and to
    /// size a compaction shift.
    pub(crate) fn total_len(&self) -> usize {
        self.head_len + self.payload_len()
    }
}

fn read_u16(buf: &[u8], offset: usize, limit: usize) -> Result<u16, TagBufError> {
    if offset + 2 > limit {
        return Err(TagBufError::ScanError);
    }
    let bytes = buf
        .get(offset..offset + 2)
        .ok_or(TagBufError::ScanError)?;
    Ok(u16::from(bytes[0]) | (u16::from(bytes[1]) << 8))
}

/// Decodes one record header starting at `offset`. `limit` is the end of
/// the value area; any field that would cross it means the buffer lies
/// about its own contents, reported as `ScanError`.
pub(crate) fn decode_head(
    buf: &[u8],
    offset: usize,
    limit: usize,
) -> Result<RecordHead, TagBufError> {
    let id = read_u16(buf, offset, limit)?;
    let tag_at = offset + ID_LEN;
    if tag_at + TAG_LEN > limit {
        return Err(TagBufError::ScanError);
    }
    let tag = *buf.get(tag_at).ok_or(TagBufError::ScanError)?;
    let is_array = tag & ARRAY_FLAG != 0;
    let base = BaseType::from_tag(tag & !ARRAY_FLAG).ok_or(TagBufError::ScanError)?;

    let mut pos = tag_at + TAG_LEN;
    let elem_size = if base == BaseType::Blob {
        let len = read_u16(buf, pos, limit)?;
        pos += LEN_FIELD_LEN;
        len
    } else {
        base.fixed_size() as u16
    };
    let elem_count = if is_array {
        let count = read_u16(buf, pos, limit)?;
        pos += LEN_FIELD_LEN;
        count
    } else {
        1
    };

    let head = RecordHead {
        id,
        base,
        elem_size,
        elem_count,
        head_len: pos - offset,
    };
    if offset + head.total_len() > limit {
        return Err(TagBufError::ScanError);
    }
    Ok(head)
}

/// Bytes a new record will occupy, header fields included.
pub(crate) fn encoded_len(base: BaseType, count: u16, payload_len: usize) -> usize {
    let mut len = ID_LEN + TAG_LEN + payload_len;
    if base == BaseType::Blob {
        len += LEN_FIELD_LEN;
    }
    if count != 1 {
        len += LEN_FIELD_LEN;
    }
    len
}

/// Encodes a record header at `offset` in a single pass, mirroring
/// `decode_head` exactly. Returns the offset where the payload starts;
/// the caller writes `payload_len` bytes there. Space has already been
/// checked by the mutation path.
#[allow(clippy::indexing_slicing, clippy::cast_possible_truncation)]
pub(crate) fn encode_head(
    buf: &mut [u8],
    offset: usize,
    id: u16,
    base: BaseType,
    count: u16,
    payload_len: usize,
) -> usize {
    let mut pos = offset;
    buf[pos..pos + ID_LEN].copy_from_slice(&id.to_le_bytes());
    pos += ID_LEN;

    let mut tag = base as u8;
    if count != 1 {
        tag |= ARRAY_FLAG;
    }
    buf[pos] = tag;
    pos += TAG_LEN;

    if base == BaseType::Blob {
        buf[pos..pos + LEN_FIELD_LEN].copy_from_slice(&(payload_len as u16).to_le_bytes());
        pos += LEN_FIELD_LEN;
    }
    if count != 1 {
        buf[pos..pos + LEN_FIELD_LEN].copy_from_slice(&count.to_le_bytes());
        pos += LEN_FIELD_LEN;
    }
    pos
}
