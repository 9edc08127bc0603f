use thiserror::Error;

use crate::types::BaseType;

/// Error types for `TagBuf` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum TagBufError {
    /// Not enough space for the requested operation, or the provided
    /// region is smaller than the fixed header
    #[error("buffer too small: {required} bytes required, but only {available} available")]
    BufferTooSmall {
        /// Number of bytes the operation needs
        required: usize,
        /// Number of bytes actually available
        available: usize,
    },
    /// A single record would exceed what the 16-bit length fields can describe
    #[error("item too big: {requested} bytes exceeds the record limit of {max}")]
    ItemTooBig {
        /// Encoded size the record would need
        requested: usize,
        /// Largest encodable record size
        max: usize,
    },
    /// The stored record's type disagrees with the expected one
    #[error("different type: record holds {stored:?}")]
    DifferentType {
        /// Base type actually stored in the record
        stored: BaseType,
    },
    /// The stored element size disagrees with the descriptor
    #[error("different size: stored element size {stored}, expected {expected}")]
    DifferentSize {
        /// Element size read back from the record
        stored: u16,
        /// Element size the descriptor captured
        expected: u16,
    },
    /// The stored element count disagrees with the descriptor
    #[error("different count: stored {stored} elements, expected {expected}")]
    DifferentCount {
        /// Element count read back from the record
        stored: u16,
        /// Element count the descriptor captured
        expected: u16,
    },
    /// No record with the requested id
    #[error("no record with id {id:#06x}")]
    NotFound {
        /// The id that was searched for
        id: u16,
    },
    /// Header version/endianness is incompatible with this implementation
    #[error("wrong version: header byte {found:#04x}, expected {expected:#04x} (minor bits ignored)")]
    WrongVersion {
        /// Version byte read from the buffer
        found: u8,
        /// Version byte this implementation writes
        expected: u8,
    },
    /// The descriptor is stale: the buffer has been mutated since `find`
    #[error("stale or invalid member descriptor")]
    BadHandle,
    /// The value area is internally inconsistent; the buffer is corrupt
    #[error("scan error: value area is inconsistent")]
    ScanError,
}
