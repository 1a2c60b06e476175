//! Errors of the packer and of the codecs built on it.
use crate::alloc::string::String;
use thiserror::Error;

/// A field or width that the [`BitPacker`] can not represent.
///
/// [`BitPacker`]: crate::bits::BitPacker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PackError {
    /// A width outside of `1..=MAX_FIELD_WIDTH`.
    #[error("field width must be in the range 1..=64, got {0}")]
    InvalidWidth(u8),
    /// The value needs more bits than its declared width.
    #[error("value {value} does not fit in {width} bits")]
    InvalidField { value: u64, width: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LzwError {
    /// The maximum code size of a resetting encoder is outside of `9..=32`.
    #[error("code size limit must be in the range 9..=32, got {0}")]
    InvalidCodeSize(u8),
    /// The codec direction has no algorithm.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
    /// A filter name that is not one of the known stream filters.
    #[error("unknown filter {0:?}")]
    UnknownFilter(String),
    #[error(transparent)]
    Pack(#[from] PackError),
}
