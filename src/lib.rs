#![no_std]

//! `TagBuf`: typed, keyed binary records packed into a client-provided
//! fixed-capacity buffer.
//!
//! `TagBuf` builds up a densely packed sequence of records (scalars,
//! fixed-width arrays, and variable-length blobs, each keyed by a 16-bit
//! id) inside a single caller-owned byte region. There is no internal
//! allocation: the region plus a five-byte header is the whole encoded
//! form, so `as_bytes()` can be written to a file or a wire as-is and
//! re-opened on the other side with [`TagBuf::open`], which checks the
//! header's version and endianness markers first.
//!
//! This crate is `no_std` compatible and works in embedded and
//! memory-constrained environments.
//!
//! # Example
//!
//! ```
//! use tagbuf::TagBuf;
//!
//! let mut region = [0u8; 256];
//! let mut buf = TagBuf::new(&mut region).unwrap();
//!
//! buf.set(0x0100, 0x55aa_i16).unwrap();
//! buf.add_blob(0x0201, b"named blob payload").unwrap();
//!
//! let member = buf.find(0x0201).unwrap();
//! assert_eq!(member.min_size(), 18);
//!
//! let mut out = [0u8; 64];
//! let n = buf.get(&member, &mut out).unwrap();
//! assert_eq!(&out[..n], b"named blob payload");
//! ```
//!
//! # Wire format
//!
//! Little-endian throughout, byte 0 at buffer start:
//!
//! ```text
//! version/endian byte (1) | value-area size (4) | records...
//! ```
//!
//! Each record is packed with no padding:
//!
//! ```text
//! id(2) | tag(1) [| blob_len(2) if blob] [| count(2) if array] | payload
//! ```
//!
//! The version byte carries the major version and an endianness marker
//! in its top bits and the minor version in its low bits. Opening an
//! existing buffer tolerates a minor-version difference; a major or
//! endianness mismatch is refused.
//!
//! # Updating and removing
//!
//! Setting an id that already exists always evicts the old record and
//! appends the new one at the end of the value area: records are never
//! rewritten in place, and the new record may have a completely
//! different type and shape. Removal shifts all following records left,
//! so the value area never fragments. Either way [`TagBuf::size`]
//! always equals header plus live records, nothing more.
//!
//! One deliberate consequence of evict-then-append: if the eviction
//! succeeds but the append is refused (no space), the old value is
//! already gone. Callers that need the old value on failure must read
//! it out first.
//!
//! # Descriptors
//!
//! [`TagBuf::find`] returns a [`Member`] describing a record's type,
//! shape, and location. Descriptors are snapshots: any structural
//! mutation moves bytes around and invalidates them. Each descriptor
//! records the buffer's generation, and [`TagBuf::get`] refuses a stale
//! one with [`TagBufError::BadHandle`], so a forgotten re-`find` is an
//! error instead of a silent wrong read.
//!
//! # Integer convenience
//!
//! [`TagBuf::set_unsigned`] and [`TagBuf::set_signed`] pick the
//! smallest integer width that holds the value losslessly, and
//! [`TagBuf::get_unsigned`] / [`TagBuf::get_signed`] widen any stored
//! width of the matching family back to 64 bits:
//!
//! ```
//! use tagbuf::{BaseType, TagBuf};
//!
//! let mut region = [0u8; 128];
//! let mut buf = TagBuf::new(&mut region).unwrap();
//!
//! buf.set_unsigned(1, 200).unwrap(); // fits a single byte
//! assert_eq!(buf.find(1).unwrap().base_type(), BaseType::U8);
//! assert_eq!(buf.get_unsigned(1).unwrap(), 200);
//!
//! buf.set_signed(2, -70_000).unwrap(); // needs 32 bits
//! assert_eq!(buf.find(2).unwrap().base_type(), BaseType::S32);
//! assert_eq!(buf.get_signed(2).unwrap(), -70_000);
//! ```
//!
//! # Nesting
//!
//! An encoded buffer is just bytes, so it can be stored as a blob inside
//! another buffer and re-opened after extraction. The copy is by-value;
//! inner and outer never alias.
//!
//! ```
//! use tagbuf::TagBuf;
//!
//! let mut inner_region = [0u8; 64];
//! let mut inner = TagBuf::new(&mut inner_region).unwrap();
//! inner.set(7, 1234_u16).unwrap();
//!
//! let mut outer_region = [0u8; 256];
//! let mut outer = TagBuf::new(&mut outer_region).unwrap();
//! outer.add_blob(0x0100, inner.as_bytes()).unwrap();
//!
//! let member = outer.find(0x0100).unwrap();
//! let mut extracted = [0u8; 64];
//! let n = outer.get(&member, &mut extracted).unwrap();
//!
//! let reopened = TagBuf::open(&mut extracted[..n]).unwrap();
//! assert_eq!(reopened.get_unsigned(7).unwrap(), 1234);
//! ```
//!
//! # Performance characteristics
//!
//! Records carry three to five bytes of overhead each and are located by
//! a linear scan, so every `find`, `get`, `set`, and `remove` is O(n) in
//! the number of records; `set` and `remove` additionally move the tail
//! of the value area. The format trades lookup speed for density and is
//! meant for small, packed buffers, not large key spaces.
//!
//! # Concurrency
//!
//! A `TagBuf` is single-owner: every operation is a bounded, synchronous
//! scan or copy over the value area with no internal locking. Callers
//! that share one buffer across threads must serialize access
//! themselves.

mod error;
mod header;
mod iter;
mod record;
mod scan;
mod tagbuf;
mod types;

// Re-export public types and traits
pub use error::TagBufError;
pub use iter::{Record, RecordIter};
pub use tagbuf::{Member, TagBuf};
pub use types::{BaseType, Scalar};
