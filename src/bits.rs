//! Re-grouping of variable-width bit fields into fixed-width values.
//!
//! The packer is the bit plumbing underneath the LZW encoder but knows nothing about LZW. It
//! accepts fields of any width up to [`MAX_FIELD_WIDTH`] and yields the concatenated bit stream,
//! most significant bit first, cut into values of the configured output width. Both widths can
//! change in the middle of the stream without losing or misaligning a single bit.
//!
//! Packing 9-bit codes into bytes:
//!
//! ```
//! use lzwpack::bits::BitPacker;
//! let mut packer = BitPacker::with_input_width(9).unwrap();
//! for &code in &[256, 45, 258, 258, 65, 259, 66, 257] {
//!     packer.pack(code).unwrap();
//! }
//! let bytes: Vec<u8> = packer.map(|byte| byte as u8).collect();
//! assert_eq!(bytes, [0x80, 0x0b, 0x60, 0x50, 0x22, 0x0c, 0x0c, 0x85, 0x01]);
//! ```
use crate::alloc::collections::VecDeque;
use crate::error::PackError;

/// The widest field, in bits, that can be packed or extracted.
pub const MAX_FIELD_WIDTH: u8 = 64;

/// Packs fields of one width into a stream of values of another width.
///
/// Fields are only queued by [`pack`]; the bits are moved into the accumulator lazily while
/// values are pulled through the `Iterator` implementation. The iterator returns `None` once the
/// queue is empty and no buffered bits remain. It keeps doing so until another field is packed.
///
/// The last value of a stream is padded with zero bits on the low side when the total number of
/// packed bits is not a multiple of the output width.
///
/// [`pack`]: #method.pack
#[derive(Clone, Debug)]
pub struct BitPacker {
    /// The width of fields packed without an explicit width.
    input_width: u8,
    /// The width of the values produced.
    output_width: u8,
    /// The widest field seen, or the widest carry kept across an output width change.
    max_width: u8,
    /// Left-justified within the low `buffer_width` bits, everything below the pending bits is
    /// zero.
    buffer: u128,
    /// The number of valid buffer bits.
    pending: u8,
    /// Fields not yet moved into the buffer.
    queue: VecDeque<(u64, u8)>,
    /// The sum of all queued widths.
    queued_bits: u64,
}

impl BitPacker {
    /// Create a packer for fields `input_width` wide producing values `output_width` wide.
    pub fn new(input_width: u8, output_width: u8) -> Result<Self, PackError> {
        let input_width = check_width(input_width)?;
        let output_width = check_width(output_width)?;
        Ok(BitPacker::from_widths(input_width, output_width))
    }

    /// Create a packer producing bytes.
    pub fn with_input_width(input_width: u8) -> Result<Self, PackError> {
        BitPacker::new(input_width, 8)
    }

    /// Construct without validation, for widths known to be in range.
    pub(crate) fn from_widths(input_width: u8, output_width: u8) -> Self {
        debug_assert!(check_width(input_width).is_ok());
        debug_assert!(check_width(output_width).is_ok());
        BitPacker {
            input_width,
            output_width,
            max_width: input_width,
            buffer: 0,
            pending: 0,
            queue: VecDeque::new(),
            queued_bits: 0,
        }
    }

    /// Append a field of the default input width.
    pub fn pack(&mut self, value: u64) -> Result<(), PackError> {
        self.pack_with_width(value, self.input_width)
    }

    /// Append a field of an explicit width.
    ///
    /// Fails without queueing anything when the width is not in `1..=MAX_FIELD_WIDTH` or when
    /// `value` does not fit into `width` bits.
    pub fn pack_with_width(&mut self, value: u64, width: u8) -> Result<(), PackError> {
        let width = check_width(width)?;
        if width < MAX_FIELD_WIDTH && value >> width != 0 {
            return Err(PackError::InvalidField { value, width });
        }

        self.push(value, width);
        Ok(())
    }

    /// Queue a field that is known to be valid.
    pub(crate) fn push(&mut self, value: u64, width: u8) {
        self.grow(width);
        self.queue.push_back((value, width));
        self.queued_bits += u64::from(width);
    }

    /// Change the default width of fields packed with [`pack`].
    ///
    /// [`pack`]: #method.pack
    pub fn set_input_field_width(&mut self, width: u8) -> Result<(), PackError> {
        let width = check_width(width)?;
        self.grow(width);
        self.input_width = width;
        Ok(())
    }

    /// Produce values `width` bits wide from now on.
    ///
    /// Bits that were already moved into the buffer but not yet returned are kept, so the stream
    /// continues exactly where the last value ended.
    pub fn set_output_field_width(&mut self, width: u8) -> Result<(), PackError> {
        let width = check_width(width)?;
        let saved = self
            .buffer
            .checked_shr(u32::from(self.buffer_width() - self.pending))
            .unwrap_or(0);

        self.output_width = width;
        self.max_width = self.max_width.max(self.pending.saturating_sub(width));
        self.buffer = saved
            .checked_shl(u32::from(self.buffer_width() - self.pending))
            .unwrap_or(0);
        Ok(())
    }

    pub fn input_field_width(&self) -> u8 {
        self.input_width
    }

    pub fn output_field_width(&self) -> u8 {
        self.output_width
    }

    /// The number of packed bits that have not been returned yet.
    pub fn available_bits(&self) -> u64 {
        u64::from(self.pending) + self.queued_bits
    }

    /// If all packed bits have been returned.
    pub fn is_drained(&self) -> bool {
        self.pending == 0 && self.queue.is_empty()
    }

    fn buffer_width(&self) -> u8 {
        self.output_width + self.max_width
    }

    /// Widen the buffer to hold fields `width` bits wide.
    fn grow(&mut self, width: u8) {
        if width <= self.max_width {
            return;
        }

        // Pending bits must stay at the top of the wider buffer.
        self.buffer <<= width - self.max_width;
        self.max_width = width;
        log::trace!("packer buffer widened to {} bits", self.buffer_width());
    }
}

impl Iterator for BitPacker {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.is_drained() {
            return None;
        }

        let buffer_width = self.buffer_width();
        while self.pending < self.output_width {
            let (value, width) = match self.queue.pop_front() {
                Some(field) => field,
                None => break,
            };
            self.queued_bits -= u64::from(width);
            self.buffer |= u128::from(value) << (buffer_width - self.pending - width);
            self.pending += width;
        }

        let value = (self.buffer >> self.max_width) & low_mask(self.output_width);
        self.buffer = (self.buffer & low_mask(self.max_width)) << self.output_width;
        self.pending = self.pending.saturating_sub(self.output_width);
        Some(value as u64)
    }
}

fn check_width(width: u8) -> Result<u8, PackError> {
    if width == 0 || width > MAX_FIELD_WIDTH {
        Err(PackError::InvalidWidth(width))
    } else {
        Ok(width)
    }
}

fn low_mask(width: u8) -> u128 {
    (1u128 << width) - 1
}
