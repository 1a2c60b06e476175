//! Decoding of LZW streams.
//!
//! Only the encoding direction is defined. The decoder exists so that callers can be written
//! against the full codec interface and fails loudly instead of passing data through.
use crate::alloc::vec::Vec;
use crate::error::LzwError;
use crate::StreamResult;

const NAME: &str = "LZW decoding";

/// A LZW decoder, every call fails with `LzwError::NotImplemented`.
#[derive(Debug, Default)]
pub struct Decoder {
    _private: (),
}

impl Decoder {
    pub fn new() -> Self {
        Decoder::default()
    }

    /// Decode some bytes from `inp` into `out`.
    ///
    /// Consumes nothing and reports `LzwError::NotImplemented`.
    pub fn decode_bytes(&mut self, _: &[u8], _: &mut [u8]) -> StreamResult {
        StreamResult {
            consumed_in: 0,
            consumed_out: 0,
            status: Err(LzwError::NotImplemented(NAME)),
        }
    }
}

/// Decode all of `data`.
pub fn decode(_: &[u8]) -> Result<Vec<u8>, LzwError> {
    Err(LzwError::NotImplemented(NAME))
}
