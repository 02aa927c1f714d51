//! Error types for ODS encoding, decoding and key-path operations.
//!
//! This module contains the [`Error`] type which represents all possible errors
//! that can occur when reading, writing or mutating an ODS buffer.
//!
//! # Example
//!
//! ```
//! use ods::{Error, Registry, Result, get};
//!
//! fn lookup(data: &[u8]) -> Result<()> {
//!     match get(data, "Car.Owner.firstName", &Registry::default()) {
//!         Ok(Some(tag)) => {
//!             println!("found {}", tag.name);
//!             Ok(())
//!         }
//!         Ok(None) => Ok(()),
//!         Err(Error::TruncatedData) => {
//!             println!("Data was truncated");
//!             Err(Error::TruncatedData)
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! # lookup(&[]).unwrap();
//! ```

use crate::TagID;

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// This type represents all possible errors that can occur when reading,
/// writing or mutating ODS data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input ended in the middle of a record.
    ///
    /// Either a header field or the value region declared by `record_length`
    /// extends past the end of the buffer.
    #[error("unexpected end of input")]
    TruncatedData,

    /// A fixed-width value carried more bytes than its width.
    #[error("trailing data after value: {0} bytes remaining")]
    TrailingData(usize),

    /// A record declared a length too small to hold its own name header.
    #[error("record length {0} is smaller than its name header")]
    InvalidLength(u32),

    /// Decoding hit a type id that is neither built-in nor registered, and
    /// permissive mode is off.
    #[error("unknown ODS tag type: {0:#04x}")]
    UnknownTagType(u8),

    /// Attempted to encode a placeholder produced by permissive decoding.
    #[error("tag `{name}` with unrecognized type {type_id:#04x} cannot be written")]
    UnwritableTag { type_id: u8, name: String },

    /// Malformed key path (empty, or containing an empty segment).
    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    /// Custom tag registration inside the reserved id range.
    #[error("tag id {0} is reserved (custom tags must use 16 or above)")]
    ReservedTagId(u8),

    /// A record length no longer fits the 32-bit length field.
    #[error("record length {0} exceeds the length field range")]
    RecordTooLarge(u64),

    /// A tag name is longer than the 16-bit name length field allows.
    #[error("tag name of {0} bytes is too long")]
    NameTooLong(usize),

    /// A mutation targeted a key that does not resolve.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// A key path tried to descend through a compressed object.
    #[error("cannot traverse compressed object at `{0}`; get the object and read its tags instead")]
    CompressedObjectTraversal(String),

    /// A key path tried to create children under a leaf value.
    #[error("`{0}` is not a container")]
    NotAContainer(String),

    /// No compressor with this name is registered.
    #[error("unknown compressor: {0}")]
    UnknownCompressor(String),

    /// A dictionary record contained the same key twice.
    #[error("duplicate dictionary key: {0}")]
    DuplicateKey(String),

    /// A value had a different type than the caller expected.
    #[error("tag type mismatch: expected {expected:?}, got {found:?}")]
    TagMismatch { expected: TagID, found: Option<TagID> },

    /// A name or string value was not valid UTF-8.
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// An I/O error occurred.
    ///
    /// This happens inside compressors and the file persistence wrapper.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
