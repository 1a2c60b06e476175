//! # Bit-field packing and LZW encoding
//!
//! This crate provides a [`BitPacker`] that re-groups a stream of variable-width bit fields into
//! values of another width, and an LZW [`Encoder`] built on it. The encoder produces the code
//! stream of the PDF `LZWDecode` filter: codes are written most significant bit first, start at 9
//! bits and widen as the code table grows.
//!
//! The encoded stream starts with a clear code and ends with an end code:
//!
//!  * `CLEAR_CODE == 256`
//!  * `END_CODE   == 257`
//!
//! By default the table grows without bound and is never reset, so codes keep widening for long
//! inputs. Classic decoders stop at 12 bits; use [`Encoder::with_code_size_limit`] to emit a
//! clear code and start over whenever the table is full.
//!
//! Example use of the encoder:
//!
//! ```
//! use lzwpack::encode::Encoder;
//! let data = b"TOBEORNOTTOBEORTOBEORNOT";
//! let mut compressed = vec![];
//!
//! let mut enc = Encoder::new();
//! let result = enc.into_stream(&mut compressed).encode_all(&data[..]);
//! result.status.unwrap();
//! assert_eq!(compressed, lzwpack::encode(data));
//! ```
//!
//! [`BitPacker`]: bits/struct.BitPacker.html
//! [`Encoder`]: encode/struct.Encoder.html
//! [`Encoder::with_code_size_limit`]: encode/struct.Encoder.html#method.with_code_size_limit
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(all(feature = "alloc", not(feature = "std")))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std as alloc;

/// Alias for a LZW code point
pub type Code = u32;

/// The code that resets the table.
pub const CLEAR_CODE: Code = 256;
/// The code marking the end of the data.
pub const END_CODE: Code = 257;
/// The width of codes directly after a clear code.
pub const MIN_CODE_SIZE: u8 = 9;

#[cfg(feature = "alloc")]
pub mod bits;
#[cfg(feature = "alloc")]
pub mod decode;
#[cfg(feature = "alloc")]
pub mod encode;
#[cfg(feature = "alloc")]
pub mod error;
#[cfg(feature = "alloc")]
pub mod filter;

#[cfg(feature = "alloc")]
pub use self::error::{LzwError, PackError};

/// The status after a successful coding step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LzwStatus {
    /// Everything went well.
    Ok,
    /// No bytes were consumed or produced, more input or output space is needed.
    NoProgress,
    /// The end code was written and all output has been flushed.
    Done,
}

/// The result of a single coding step.
#[cfg(feature = "alloc")]
#[must_use = "Contains a status with potential error information"]
pub struct StreamResult {
    /// The number of bytes consumed from the input buffer.
    pub consumed_in: usize,
    /// The number of bytes written into the output buffer.
    pub consumed_out: usize,
    /// The status after returning from the coding call.
    pub status: Result<LzwStatus, LzwError>,
}

/// The result of coding into a vector.
#[cfg(feature = "alloc")]
#[must_use = "Contains a status with potential error information"]
pub struct VectorResult {
    /// The number of bytes consumed from the input buffer.
    pub consumed_in: usize,
    /// The number of bytes appended to the vector.
    pub consumed_out: usize,
    /// The status after returning from the coding call.
    pub status: Result<LzwStatus, LzwError>,
}

/// The result of coding a whole reader into a writer.
#[cfg(feature = "std")]
#[must_use = "Contains a status with potential error information"]
pub struct AllResult {
    /// The total number of bytes consumed from the reader.
    pub bytes_read: usize,
    /// The total number of bytes written into the writer.
    pub bytes_written: usize,
    /// The possible error that occurred.
    ///
    /// Codec errors are reported with `io::ErrorKind::InvalidData`.
    pub status: std::io::Result<()>,
}

/// Encode `data` with an unbounded code table.
#[cfg(feature = "alloc")]
pub fn encode(data: &[u8]) -> alloc::vec::Vec<u8> {
    encode::encode(data)
}

/// Decode a LZW stream.
///
/// Always fails with [`LzwError::NotImplemented`].
///
/// [`LzwError::NotImplemented`]: error/enum.LzwError.html#variant.NotImplemented
#[cfg(feature = "alloc")]
pub fn decode(data: &[u8]) -> Result<alloc::vec::Vec<u8>, LzwError> {
    decode::decode(data)
}
