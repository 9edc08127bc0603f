use crate::error::TagBufError;
use crate::header::{self, HEADER_SIZE};
use crate::iter::RecordIter;
use crate::record;
use crate::scan::{self, FoundRecord};
use crate::types::{BaseType, Scalar};

/// Payload slice of a scalar record located for a typed read.
struct FoundPayload<'b> {
    base: BaseType,
    payload: &'b [u8],
}

/// Descriptor of a located record, produced by [`TagBuf::find`].
///
/// A descriptor is only valid until the next structural mutation of the
/// buffer it came from: append and compaction both relocate bytes. The
/// descriptor carries the buffer generation it was created at, and
/// [`TagBuf::get`] rejects a stale one with
/// [`BadHandle`](TagBufError::BadHandle); re-`find` after any mutation.
#[derive(Debug, Clone)]
pub struct Member {
    id: u16,
    base: BaseType,
    elem_size: u16,
    elem_count: u16,
    offset: usize,
    generation: u32,
}

impl Member {
    /// Id of the located record.
    #[must_use]
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Base type of the located record.
    #[must_use]
    pub fn base_type(&self) -> BaseType {
        self.base
    }

    /// Size of one element in bytes; for a blob, its stored byte length.
    #[must_use]
    pub fn elem_size(&self) -> u16 {
        self.elem_size
    }

    /// Number of elements (1 for scalars and blobs).
    #[must_use]
    pub fn elem_count(&self) -> u16 {
        self.elem_count
    }

    /// Minimum byte size a receiving buffer needs for [`TagBuf::get`].
    #[must_use]
    pub fn min_size(&self) -> usize {
        self.elem_size as usize * self.elem_count as usize
    }
}

/// Typed, keyed binary records packed into a client-provided buffer.
///
/// The engine borrows the caller's byte region for its own lifetime and
/// never allocates. All record data and the small fixed header live in
/// the region itself, so the encoded form can be transmitted or stored
/// as-is and re-opened later with [`TagBuf::open`].
#[derive(Debug)]
pub struct TagBuf<'a> {
    buffer: &'a mut [u8],
    header: u8,
    vals_size: usize,
    generation: u32,
}

impl<'a> TagBuf<'a> {
    /// Creates a fresh buffer: zero-fills the region and writes a new
    /// header with an empty value area.
    ///
    /// # Errors
    ///
    /// Returns `TagBufError::BufferTooSmall` if the region cannot hold
    /// the fixed header.
    pub fn new(buffer: &'a mut [u8]) -> Result<Self, TagBufError> {
        if buffer.len() < HEADER_SIZE {
            return Err(TagBufError::BufferTooSmall {
                required: HEADER_SIZE,
                available: buffer.len(),
            });
        }
        buffer.fill(0);
        header::write_fresh(buffer);
        Ok(Self {
            buffer,
            header: header::VERSION_BYTE,
            vals_size: 0,
            generation: 0,
        })
    }

    /// Opens a region that already contains an encoded buffer, for
    /// example one received over a channel, without clearing it.
    ///
    /// Only the major version and endianness bits of the header are
    /// required to match this implementation; a different minor version
    /// is accepted.
    ///
    /// # Errors
    ///
    /// - `TagBufError::BufferTooSmall` if the region cannot hold the
    ///   header, or if the recorded value-area size runs past the end of
    ///   the region
    /// - `TagBufError::WrongVersion` on a major version or endianness
    ///   mismatch
    pub fn open(buffer: &'a mut [u8]) -> Result<Self, TagBufError> {
        if buffer.len() < HEADER_SIZE {
            return Err(TagBufError::BufferTooSmall {
                required: HEADER_SIZE,
                available: buffer.len(),
            });
        }
        let found = buffer[header::VERSION_OFFSET];
        header::check_compat(found)?;
        let vals_size = header::read_vals_size(buffer);
        if HEADER_SIZE + vals_size > buffer.len() {
            return Err(TagBufError::BufferTooSmall {
                required: HEADER_SIZE + vals_size,
                available: buffer.len(),
            });
        }
        Ok(Self {
            buffer,
            header: found,
            vals_size,
            generation: 0,
        })
    }

    /// Bytes of the region that are currently meaningful: the header
    /// plus the value area. This is the count to transmit or persist.
    #[must_use]
    pub fn size(&self) -> usize {
        HEADER_SIZE + self.vals_size
    }

    /// Total capacity of the underlying region.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes still available for new records.
    #[must_use]
    pub fn free_space(&self) -> usize {
        self.buffer.len() - self.size()
    }

    /// True when the value area holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vals_size == 0
    }

    /// Major and minor version read from the buffer header.
    #[must_use]
    pub fn version(&self) -> (u8, u8) {
        ((self.header >> 3) & 0x7, self.header & 0x7)
    }

    /// The meaningful prefix of the region. Suitable for transmission,
    /// persistence, or embedding into another buffer as a blob.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer
            .get(..self.size())
            .expect("value area fits the region")
    }

    /// Drops all records, keeping the buffer usable.
    pub fn clear(&mut self) {
        self.vals_size = 0;
        header::write_vals_size(self.buffer, 0);
        self.generation = self.generation.wrapping_add(1);
    }

    /// Iterates over the records in insertion order.
    #[must_use]
    pub fn iter(&self) -> RecordIter<'_> {
        RecordIter::new(self.buffer, self.vals_size)
    }

    /// Locates a record by id. On duplicate ids the first record in
    /// insertion order wins.
    ///
    /// # Errors
    ///
    /// Returns `TagBufError::NotFound` if no record has this id, or
    /// `TagBufError::ScanError` if the value area is corrupt.
    pub fn find(&self, id: u16) -> Result<Member, TagBufError> {
        let outcome = scan::scan(self.buffer, self.vals_size, id)?;
        match outcome.found {
            Some(f) => Ok(Member {
                id: f.head.id,
                base: f.head.base,
                elem_size: f.head.elem_size,
                elem_count: f.head.elem_count,
                offset: f.start,
                generation: self.generation,
            }),
            None => Err(TagBufError::NotFound { id }),
        }
    }

    /// Copies a located record's payload into `out`, returning the
    /// number of bytes written.
    ///
    /// The record's stored type, element size, and element count are
    /// re-validated at the descriptor's offset before anything is
    /// copied; no partial data is ever written.
    ///
    /// # Errors
    ///
    /// - `TagBufError::BadHandle` if the buffer has been mutated since
    ///   the descriptor was produced
    /// - `TagBufError::DifferentType` / `DifferentSize` /
    ///   `DifferentCount` if the stored record no longer matches the
    ///   descriptor
    /// - `TagBufError::BufferTooSmall` if `out` is shorter than
    ///   [`Member::min_size`]
    #[allow(clippy::expect_used)]
    pub fn get(&self, member: &Member, out: &mut [u8]) -> Result<usize, TagBufError> {
        if member.generation != self.generation {
            return Err(TagBufError::BadHandle);
        }
        let head = record::decode_head(self.buffer, member.offset, self.size())?;
        if head.base != member.base {
            return Err(TagBufError::DifferentType { stored: head.base });
        }
        if head.elem_size != member.elem_size {
            return Err(TagBufError::DifferentSize {
                stored: head.elem_size,
                expected: member.elem_size,
            });
        }
        if head.elem_count != member.elem_count {
            return Err(TagBufError::DifferentCount {
                stored: head.elem_count,
                expected: member.elem_count,
            });
        }
        let len = head.payload_len();
        if out.len() < len {
            return Err(TagBufError::BufferTooSmall {
                required: len,
                available: out.len(),
            });
        }
        let payload_at = member.offset + head.head_len;
        let payload = self
            .buffer
            .get(payload_at..payload_at + len)
            .expect("record bounds validated by decode_head");
        out.get_mut(..len)
            .expect("out length checked above")
            .copy_from_slice(payload);
        Ok(len)
    }

    /// Stores a scalar under `id`, replacing any existing record with
    /// that id regardless of its old type or shape.
    ///
    /// # Errors
    ///
    /// See [`TagBuf::set_array`]; a scalar cannot hit `ItemTooBig`.
    pub fn set<T: Scalar>(&mut self, id: u16, value: T) -> Result<(), TagBufError> {
        let size = T::BASE.fixed_size();
        self.upsert(id, T::BASE, 1, size, |out| value.write_le(out))
    }

    /// Stores a fixed-width array under `id`, replacing any existing
    /// record with that id. A one-element slice is stored as a plain
    /// scalar record.
    ///
    /// # Errors
    ///
    /// - `TagBufError::ItemTooBig` if the encoded record cannot be
    ///   described by the 16-bit length fields
    /// - `TagBufError::BufferTooSmall` if the record does not fit the
    ///   remaining free space. The replaced record, if any, has already
    ///   been evicted at that point; a failed update loses the old
    ///   value.
    pub fn set_array<T: Scalar>(&mut self, id: u16, values: &[T]) -> Result<(), TagBufError> {
        let elem_size = T::BASE.fixed_size();
        let payload_len = values.len() * elem_size;
        let Ok(count) = u16::try_from(values.len()) else {
            return Err(TagBufError::ItemTooBig {
                requested: record::encoded_len(T::BASE, 0, payload_len),
                max: record::MAX_RECORD_LEN,
            });
        };
        self.upsert(id, T::BASE, count, payload_len, |out| {
            for (chunk, value) in out.chunks_exact_mut(elem_size).zip(values) {
                value.write_le(chunk);
            }
        })
    }

    /// Stores an opaque byte payload under `id`, replacing any existing
    /// record with that id.
    ///
    /// # Errors
    ///
    /// Same as [`TagBuf::set_array`].
    pub fn add_blob(&mut self, id: u16, bytes: &[u8]) -> Result<(), TagBufError> {
        self.upsert(id, BaseType::Blob, 1, bytes.len(), |out| {
            out.copy_from_slice(bytes);
        })
    }

    /// Removes the record with `id`, shifting all following records
    /// left so the value area stays densely packed.
    ///
    /// # Errors
    ///
    /// Returns `TagBufError::NotFound` if no record has this id, and
    /// `TagBufError::ScanError` if the value area is corrupt.
    pub fn remove(&mut self, id: u16) -> Result<(), TagBufError> {
        let outcome = scan::scan(self.buffer, self.vals_size, id)?;
        match outcome.found {
            Some(found) => self.shift_out(found, outcome.end),
            None => Err(TagBufError::NotFound { id }),
        }
    }

    /// Stores an unsigned value in the smallest of U8/U16/U32/U64 that
    /// holds it losslessly.
    ///
    /// # Errors
    ///
    /// Same as [`TagBuf::set`].
    pub fn set_unsigned(&mut self, id: u16, value: u64) -> Result<(), TagBufError> {
        if let Ok(v) = u8::try_from(value) {
            self.set(id, v)
        } else if let Ok(v) = u16::try_from(value) {
            self.set(id, v)
        } else if let Ok(v) = u32::try_from(value) {
            self.set(id, v)
        } else {
            self.set(id, value)
        }
    }

    /// Stores a signed value in the smallest of S8/S16/S32/S64 that
    /// holds it losslessly.
    ///
    /// # Errors
    ///
    /// Same as [`TagBuf::set`].
    pub fn set_signed(&mut self, id: u16, value: i64) -> Result<(), TagBufError> {
        if let Ok(v) = i8::try_from(value) {
            self.set(id, v)
        } else if let Ok(v) = i16::try_from(value) {
            self.set(id, v)
        } else if let Ok(v) = i32::try_from(value) {
            self.set(id, v)
        } else {
            self.set(id, value)
        }
    }

    /// Reads back a scalar stored with any of the unsigned widths,
    /// widened to 64 bits.
    ///
    /// # Errors
    ///
    /// - `TagBufError::NotFound` if no record has this id
    /// - `TagBufError::DifferentType` if the stored type is not in the
    ///   unsigned family
    /// - `TagBufError::DifferentCount` if the record is an array
    pub fn get_unsigned(&self, id: u16) -> Result<u64, TagBufError> {
        let found = self.scalar_payload(id)?;
        let payload = found.payload;
        match found.base {
            BaseType::U8 => Ok(u64::from(u8::read_le(payload))),
            BaseType::U16 => Ok(u64::from(u16::read_le(payload))),
            BaseType::U32 => Ok(u64::from(u32::read_le(payload))),
            BaseType::U64 => Ok(u64::read_le(payload)),
            stored => Err(TagBufError::DifferentType { stored }),
        }
    }

    /// Reads back a scalar stored with any of the signed widths,
    /// sign-extended to 64 bits.
    ///
    /// # Errors
    ///
    /// As [`TagBuf::get_unsigned`], for the signed family.
    pub fn get_signed(&self, id: u16) -> Result<i64, TagBufError> {
        let found = self.scalar_payload(id)?;
        let payload = found.payload;
        match found.base {
            BaseType::S8 => Ok(i64::from(i8::read_le(payload))),
            BaseType::S16 => Ok(i64::from(i16::read_le(payload))),
            BaseType::S32 => Ok(i64::from(i32::read_le(payload))),
            BaseType::S64 => Ok(i64::read_le(payload)),
            stored => Err(TagBufError::DifferentType { stored }),
        }
    }

    /// Reads back a scalar of exactly type `T`.
    ///
    /// # Errors
    ///
    /// - `TagBufError::NotFound` if no record has this id
    /// - `TagBufError::DifferentType` if the stored base type is not
    ///   `T`'s
    /// - `TagBufError::DifferentCount` if the record is an array
    pub fn get_scalar<T: Scalar>(&self, id: u16) -> Result<T, TagBufError> {
        let found = self.scalar_payload(id)?;
        if found.base != T::BASE {
            return Err(TagBufError::DifferentType { stored: found.base });
        }
        Ok(T::read_le(found.payload))
    }

    /// Locates `id` and returns its payload, requiring scalar shape.
    #[allow(clippy::expect_used)]
    fn scalar_payload(&self, id: u16) -> Result<FoundPayload<'_>, TagBufError> {
        let outcome = scan::scan(self.buffer, self.vals_size, id)?;
        let found = outcome.found.ok_or(TagBufError::NotFound { id })?;
        if found.head.elem_count != 1 {
            return Err(TagBufError::DifferentCount {
                stored: found.head.elem_count,
                expected: 1,
            });
        }
        let payload_at = found.start + found.head.head_len;
        let payload = self
            .buffer
            .get(payload_at..payload_at + found.head.payload_len())
            .expect("record bounds validated by scan");
        Ok(FoundPayload {
            base: found.head.base,
            payload,
        })
    }

    /// Evict-then-append core shared by every setter. The eviction, when
    /// it happens, is not rolled back if the append is later refused.
    #[allow(clippy::expect_used)]
    fn upsert<F>(
        &mut self,
        id: u16,
        base: BaseType,
        count: u16,
        payload_len: usize,
        fill: F,
    ) -> Result<(), TagBufError>
    where
        F: FnOnce(&mut [u8]),
    {
        let outcome = scan::scan(self.buffer, self.vals_size, id)?;
        if let Some(found) = outcome.found {
            self.shift_out(found, outcome.end)?;
        }

        let needed = record::encoded_len(base, count, payload_len);
        if needed > record::MAX_RECORD_LEN {
            return Err(TagBufError::ItemTooBig {
                requested: needed,
                max: record::MAX_RECORD_LEN,
            });
        }
        let available = self.free_space();
        if needed > available {
            return Err(TagBufError::BufferTooSmall {
                required: needed,
                available,
            });
        }

        let start = self.size();
        let payload_at = record::encode_head(self.buffer, start, id, base, count, payload_len);
        fill(
            self.buffer
                .get_mut(payload_at..payload_at + payload_len)
                .expect("free space checked above"),
        );
        self.vals_size += needed;
        header::write_vals_size(self.buffer, self.vals_size);
        self.generation = self.generation.wrapping_add(1);
        Ok(())
    }

    /// Compacts the record out of the value area with a single left
    /// shift of everything behind it, then persists the shrunk size.
    /// `area_end` is the terminal offset reported by the scan that
    /// located the record.
    fn shift_out(&mut self, found: FoundRecord, area_end: usize) -> Result<(), TagBufError> {
        if found.end <= found.start {
            return Err(TagBufError::ScanError);
        }
        self.buffer.copy_within(found.end..area_end, found.start);
        self.vals_size -= found.end - found.start;
        header::write_vals_size(self.buffer, self.vals_size);
        self.generation = self.generation.wrapping_add(1);
        Ok(())
    }
}
