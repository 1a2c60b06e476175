//! A module for all encoding needs.
use crate::alloc::vec::Vec;
use crate::bits::BitPacker;
use crate::error::LzwError;
use crate::{Code, LzwStatus, StreamResult, VectorResult, CLEAR_CODE, END_CODE, MIN_CODE_SIZE};

#[cfg(feature = "std")]
use crate::AllResult;
#[cfg(feature = "std")]
use std::io::{self, BufRead, Write};

/// The largest code size accepted by [`Encoder::with_code_size_limit`].
///
/// [`Encoder::with_code_size_limit`]: struct.Encoder.html#method.with_code_size_limit
pub const MAX_CODE_SIZE_LIMIT: u8 = 32;

/// The width of the packed output values.
const BYTE: u8 = 8;

/// The size of the intermediate buffer of the stream frontends.
#[cfg(feature = "std")]
const STREAM_BUFFER: usize = 1 << 16;

/// A LZW encoder producing a byte stream.
///
/// The encoder is a resumable state machine: feed it input with [`encode_bytes`], mark the end of
/// the input with [`finish`], and keep calling until the status is `LzwStatus::Done`. The
/// higher-level interfaces [`into_stream`], [`into_vec`] and `into_async` do this for you.
///
/// [`encode_bytes`]: #method.encode_bytes
/// [`finish`]: #method.finish
/// [`into_stream`]: #method.into_stream
/// [`into_vec`]: #method.into_vec
pub struct Encoder {
    state: EncodeState,
}

/// A encoding stream sink.
///
/// See [`Encoder::into_stream`] on how to create this type and more information.
///
/// [`Encoder::into_stream`]: struct.Encoder.html#method.into_stream
#[cfg(feature = "std")]
pub struct IntoStream<'d, W> {
    encoder: &'d mut Encoder,
    writer: W,
}

/// An encoding sink appending to a vector.
///
/// See [`Encoder::into_vec`] on how to create this type.
///
/// [`Encoder::into_vec`]: struct.Encoder.html#method.into_vec
pub struct IntoVec<'d> {
    encoder: &'d mut Encoder,
    vector: &'d mut Vec<u8>,
}

/// An async encoding sink.
///
/// See [`Encoder::into_async`] on how to create this type.
///
/// [`Encoder::into_async`]: struct.Encoder.html#method.into_async
#[cfg(feature = "async")]
pub struct IntoAsync<'d, W> {
    encoder: &'d mut Encoder,
    writer: W,
}

struct EncodeState {
    /// The code size at which the table is reset, if any.
    max_size: Option<u8>,
    /// The current encoding symbol tree.
    tree: Tree,
    /// If the caller marked the input as complete.
    has_ended: bool,
    /// If the trailing code and the end code are packed.
    end_packed: bool,
    /// The code corresponding to the currently read characters, the clear code if none.
    current_code: Code,
    /// Re-groups the variable-width codes into bytes.
    packer: BitPacker,
}

/// One tree node for at most each code.
/// To avoid using too much memory we keep nodes with few successors in optimized form. This form
/// doesn't offer lookup by indexing but instead does a linear search.
#[derive(Default)]
struct Tree {
    simples: Vec<Simple>,
    complex: Vec<Full>,
    keys: Vec<FullKey>,
}

#[derive(Clone, Copy)]
enum FullKey {
    NoSuccessor,
    Simple(u32),
    Full(u32),
}

const SHORT: usize = 16;

/// The number of table entries directly after a reset, the bytes plus clear and end code.
const MIN_ENTRIES: u16 = 258;

/// Marks a missing successor in a `Full` node.
const NO_CODE: Code = Code::MAX;

#[derive(Clone, Copy)]
struct Simple {
    codes: [Code; SHORT],
    chars: [u8; SHORT],
    count: u8,
}

#[derive(Clone, Copy)]
struct Full {
    char_continuation: [Code; 256],
}

impl Encoder {
    /// Create an encoder whose code table is never reset.
    ///
    /// Codes widen by one bit every time the table size crosses a power of two, without any
    /// upper bound. Use this to reproduce streams of writers that never emit a table reset.
    pub fn new() -> Self {
        Encoder {
            state: EncodeState::new(None),
        }
    }

    /// Create an encoder that resets its table before codes exceed `max_size` bits.
    ///
    /// When the next code to assign no longer fits into `max_size` bits, a clear code is written
    /// with the current width and encoding continues with a fresh table and 9-bit codes. Use a
    /// limit of 12 for streams read by common `LZWDecode` implementations.
    pub fn with_code_size_limit(max_size: u8) -> Result<Self, LzwError> {
        if max_size < MIN_CODE_SIZE || max_size > MAX_CODE_SIZE_LIMIT {
            return Err(LzwError::InvalidCodeSize(max_size));
        }

        Ok(Encoder {
            state: EncodeState::new(Some(max_size)),
        })
    }

    /// Encode some bytes from `inp` into `out`.
    ///
    /// See [`into_stream`] for high-level functions (this interface is only available with the
    /// `std` feature) and [`finish`] for marking the input data as complete.
    ///
    /// [`into_stream`]: #method.into_stream
    /// [`finish`]: #method.finish
    pub fn encode_bytes(&mut self, inp: &[u8], out: &mut [u8]) -> StreamResult {
        self.state.advance(inp, out)
    }

    /// Construct an encoder into a writer.
    #[cfg(feature = "std")]
    pub fn into_stream<W: Write>(&mut self, writer: W) -> IntoStream<'_, W> {
        IntoStream {
            encoder: self,
            writer,
        }
    }

    /// Construct an encoder appending to a vector.
    pub fn into_vec<'lt>(&'lt mut self, vec: &'lt mut Vec<u8>) -> IntoVec<'lt> {
        IntoVec {
            encoder: self,
            vector: vec,
        }
    }

    /// Construct an encoder into an async writer.
    #[cfg(feature = "async")]
    pub fn into_async<W: futures::AsyncWrite>(&mut self, writer: W) -> IntoAsync<'_, W> {
        IntoAsync {
            encoder: self,
            writer,
        }
    }

    /// Mark the encoding as finished.
    ///
    /// In following calls to `encode_bytes` the encoder will write the code of the pending
    /// characters and an end code after encoding all of `inp`, then flush the last partial byte
    /// padded with zero bits.
    pub fn finish(&mut self) {
        self.state.has_ended = true;
    }

    /// Check if the end code has been written and all output flushed.
    pub fn has_ended(&self) -> bool {
        self.state.end_packed && self.state.packer.is_drained()
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::new()
    }
}

/// Encode all of `data` with an unbounded table.
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut encoder = Encoder::new();
    let mut compressed = Vec::with_capacity(data.len() / 2 + 8);
    let result = encoder.into_vec(&mut compressed).encode_all(data);
    debug_assert!(matches!(result.status, Ok(LzwStatus::Done)));
    compressed
}

#[cfg(feature = "std")]
impl<W: Write> IntoStream<'_, W> {
    /// Encode data from a reader.
    ///
    /// This will drain the supplied reader. It will not encode an end marker after all data has
    /// been processed.
    pub fn encode(&mut self, read: impl BufRead) -> AllResult {
        self.encode_part(read, false)
    }

    /// Encode data from a reader and an end marker.
    pub fn encode_all(mut self, read: impl BufRead) -> AllResult {
        self.encode_part(read, true)
    }

    fn encode_part(&mut self, mut read: impl BufRead, finish: bool) -> AllResult {
        let IntoStream { encoder, writer } = self;
        enum Progress {
            Ok,
            Done,
        }

        let mut bytes_read = 0;
        let mut bytes_written = 0;

        let read_bytes = &mut bytes_read;
        let write_bytes = &mut bytes_written;

        let mut outbuf = vec![0; STREAM_BUFFER];
        let once = move || {
            let data = read.fill_buf()?;

            if data.is_empty() {
                if finish {
                    encoder.finish();
                } else {
                    return Ok(Progress::Done);
                }
            }

            let result = encoder.encode_bytes(data, &mut outbuf[..]);
            *read_bytes += result.consumed_in;
            *write_bytes += result.consumed_out;
            read.consume(result.consumed_in);

            let done = result
                .status
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

            if let LzwStatus::Done = done {
                writer.write_all(&outbuf[..result.consumed_out])?;
                return Ok(Progress::Done);
            }

            if let LzwStatus::NoProgress = done {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "No more data but no end marker written",
                ));
            }

            writer.write_all(&outbuf[..result.consumed_out])?;
            Ok(Progress::Ok)
        };

        let status = core::iter::repeat_with(once)
            // scan+fuse can be replaced with map_while
            .scan((), |(), result| match result {
                Ok(Progress::Ok) => Some(Ok(())),
                Err(err) => Some(Err(err)),
                Ok(Progress::Done) => None,
            })
            .fuse()
            .collect();

        AllResult {
            bytes_read,
            bytes_written,
            status,
        }
    }
}

impl IntoVec<'_> {
    /// Encode data from a slice, without an end marker.
    pub fn encode(&mut self, read: &[u8]) -> VectorResult {
        self.encode_part(read, false)
    }

    /// Encode data from a slice and an end marker.
    pub fn encode_all(mut self, read: &[u8]) -> VectorResult {
        self.encode_part(read, true)
    }

    fn grab_buffer(&mut self) -> (&mut [u8], &mut Encoder) {
        const CHUNK_SIZE: usize = 1 << 12;
        let encoder = &mut self.encoder;
        let length = self.vector.len();

        self.vector.reserve(CHUNK_SIZE);
        self.vector.resize(length + CHUNK_SIZE, 0u8);

        (&mut self.vector[length..], encoder)
    }

    fn encode_part(&mut self, part: &[u8], finish: bool) -> VectorResult {
        let mut result = VectorResult {
            consumed_in: 0,
            consumed_out: 0,
            status: Ok(LzwStatus::Ok),
        };

        enum Progress {
            Ok,
            Done,
        }

        // Converting to mutable refs to move into the `once` closure.
        let read_bytes = &mut result.consumed_in;
        let write_bytes = &mut result.consumed_out;
        let mut data = part;

        let once = move || {
            // Grab a new output buffer.
            let (outbuf, encoder) = self.grab_buffer();

            if finish && data.is_empty() {
                encoder.finish();
            }

            // Encode as much of the buffer as fits.
            let result = encoder.encode_bytes(data, &mut outbuf[..]);
            // Do the bookkeeping and consume the buffer.
            *read_bytes += result.consumed_in;
            *write_bytes += result.consumed_out;
            data = &data[result.consumed_in..];

            let unfilled = outbuf.len() - result.consumed_out;
            let filled = self.vector.len() - unfilled;
            self.vector.truncate(filled);

            // There is always output space, so no progress means nothing is left to do.
            match result.status {
                Ok(LzwStatus::Done) | Ok(LzwStatus::NoProgress) => Ok(Progress::Done),
                Ok(LzwStatus::Ok) if !finish && data.is_empty() && unfilled > 0 => {
                    Ok(Progress::Done)
                }
                Ok(LzwStatus::Ok) => Ok(Progress::Ok),
                Err(err) => Err(err),
            }
        };

        // Encode chunks of input data until we're done.
        let status: Result<(), _> = core::iter::repeat_with(once)
            // scan+fuse can be replaced with map_while
            .scan((), |(), result| match result {
                Ok(Progress::Ok) => Some(Ok(())),
                Err(err) => Some(Err(err)),
                Ok(Progress::Done) => None,
            })
            .fuse()
            .collect();

        if let Err(err) = status {
            result.status = Err(err);
        } else if finish {
            result.status = Ok(LzwStatus::Done);
        }

        result
    }
}

#[cfg(feature = "async")]
impl<W: futures::AsyncWrite + core::marker::Unpin> IntoAsync<'_, W> {
    /// Encode data from a reader.
    ///
    /// This will drain the supplied reader. It will not encode an end marker after all data has
    /// been processed.
    pub async fn encode(&mut self, read: impl futures::AsyncBufRead) -> AllResult {
        self.encode_part(read, false).await
    }

    /// Encode data from a reader and an end marker.
    pub async fn encode_all(mut self, read: impl futures::AsyncBufRead) -> AllResult {
        self.encode_part(read, true).await
    }

    async fn encode_part(&mut self, read: impl futures::AsyncBufRead, finish: bool) -> AllResult {
        use futures::io::{AsyncBufReadExt, AsyncWriteExt};

        let IntoAsync { encoder, writer } = self;
        futures::pin_mut!(read);

        let mut bytes_read = 0;
        let mut bytes_written = 0;
        let mut outbuf = vec![0; STREAM_BUFFER];

        let status = loop {
            let data = match read.fill_buf().await {
                Ok(data) => data,
                Err(err) => break Err(err),
            };

            if data.is_empty() {
                if finish {
                    encoder.finish();
                } else {
                    break Ok(());
                }
            }

            let result = encoder.encode_bytes(data, &mut outbuf[..]);
            bytes_read += result.consumed_in;
            bytes_written += result.consumed_out;
            read.consume_unpin(result.consumed_in);

            let done = match result.status {
                Ok(done) => done,
                Err(err) => break Err(io::Error::new(io::ErrorKind::InvalidData, err)),
            };

            if let LzwStatus::NoProgress = done {
                break Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "No more data but no end marker written",
                ));
            }

            if let Err(err) = writer.write_all(&outbuf[..result.consumed_out]).await {
                break Err(err);
            }

            if let LzwStatus::Done = done {
                break writer.flush().await;
            }
        };

        AllResult {
            bytes_read,
            bytes_written,
            status,
        }
    }
}

impl EncodeState {
    fn new(max_size: Option<u8>) -> Self {
        let mut tree = Tree::default();
        tree.init();
        let mut packer = BitPacker::from_widths(MIN_CODE_SIZE, BYTE);
        packer.push(CLEAR_CODE.into(), MIN_CODE_SIZE);
        EncodeState {
            max_size,
            tree,
            has_ended: false,
            end_packed: false,
            current_code: CLEAR_CODE,
            packer,
        }
    }

    fn advance(&mut self, mut inp: &[u8], mut out: &mut [u8]) -> StreamResult {
        let c_in = inp.len();
        let c_out = out.len();
        let status = self.advance_inner(&mut inp, &mut out);
        let (consumed_in, consumed_out) = (c_in - inp.len(), c_out - out.len());

        let status = status.map(|status| match status {
            LzwStatus::Ok if consumed_in == 0 && consumed_out == 0 => LzwStatus::NoProgress,
            other => other,
        });

        StreamResult {
            consumed_in,
            consumed_out,
            status,
        }
    }

    fn advance_inner(
        &mut self,
        inp: &mut &[u8],
        out: &mut &mut [u8],
    ) -> Result<LzwStatus, LzwError> {
        loop {
            self.push_out(out);

            // Whole bytes are left over, the output is full.
            if self.packer.available_bits() >= u64::from(BYTE) {
                break;
            }

            if inp.is_empty() {
                if self.has_ended && !self.end_packed {
                    self.pack_end()?;
                    continue;
                }

                break;
            }

            self.consume(inp)?;
        }

        if self.end_packed && self.packer.is_drained() {
            Ok(LzwStatus::Done)
        } else {
            Ok(LzwStatus::Ok)
        }
    }

    /// Read characters until one code has been packed or the input is empty.
    fn consume(&mut self, inp: &mut &[u8]) -> Result<(), LzwError> {
        let data = *inp;
        for (idx, &byte) in data.iter().enumerate() {
            match self.tree.iterate(self.current_code, byte) {
                Ok(code) => self.current_code = code,
                Err(new_code) => {
                    *inp = &data[idx + 1..];
                    let code = core::mem::replace(&mut self.current_code, Code::from(byte));
                    self.pack_code(code)?;
                    self.bump_code_size(new_code)?;
                    self.reset_if_full(new_code)?;
                    return Ok(());
                }
            }
        }

        *inp = &[];
        Ok(())
    }

    fn pack_end(&mut self) -> Result<(), LzwError> {
        if self.current_code != CLEAR_CODE {
            let code = core::mem::replace(&mut self.current_code, CLEAR_CODE);
            self.pack_code(code)?;

            // A decoder adds one more entry after reading this code and widens before the end
            // code. `reset_if_full` keeps the next code within the limit.
            self.bump_code_size(self.tree.next_code())?;
        }

        self.pack_code(END_CODE)?;
        self.end_packed = true;
        Ok(())
    }

    /// Widen subsequent codes so that `code` is representable.
    fn bump_code_size(&mut self, code: Code) -> Result<(), LzwError> {
        let size = code_size(code);
        if size > self.packer.input_field_width() {
            log::debug!("code size grows to {} bits at code {}", size, code);
            self.packer.set_input_field_width(size)?;
        }

        Ok(())
    }

    fn reset_if_full(&mut self, newest: Code) -> Result<(), LzwError> {
        let full = match newest.checked_add(1) {
            Some(next) => !self.fits_limit(next),
            None => true,
        };

        if full {
            log::debug!("code table full at code {}, resetting", newest);
            self.pack_code(CLEAR_CODE)?;
            self.tree.reset();
            self.packer.set_input_field_width(MIN_CODE_SIZE)?;
        }

        Ok(())
    }

    fn fits_limit(&self, code: Code) -> bool {
        match self.max_size {
            Some(max_size) => code_size(code) <= max_size,
            None => true,
        }
    }

    fn pack_code(&mut self, code: Code) -> Result<(), LzwError> {
        log::trace!("code {} with {} bits", code, self.packer.input_field_width());
        self.packer.pack(code.into())?;
        Ok(())
    }

    /// Write out whole bytes, and after the end code also the padded last byte.
    fn push_out(&mut self, out: &mut &mut [u8]) {
        let mut written = 0;
        for slot in out.iter_mut() {
            let whole = self.packer.available_bits() >= u64::from(BYTE);
            if !whole && !(self.end_packed && !self.packer.is_drained()) {
                break;
            }

            match self.packer.next() {
                Some(byte) => *slot = byte as u8,
                None => break,
            }
            written += 1;
        }

        let (_, tail) = core::mem::replace(out, &mut []).split_at_mut(written);
        *out = tail;
    }
}

/// The number of bits needed to represent `code`.
fn code_size(code: Code) -> u8 {
    (Code::BITS - code.leading_zeros()) as u8
}

impl Tree {
    fn init(&mut self) {
        // We need a way to represent the state of a currently empty buffer. We use the clear code
        // for this, thus create one complex mapping that leads to the one-char base codes.
        self.keys.resize(usize::from(MIN_ENTRIES), FullKey::NoSuccessor);
        let mut map_of_begin = Full {
            char_continuation: [0; 256],
        };
        for (ch, code) in map_of_begin.char_continuation.iter_mut().enumerate() {
            *code = ch as Code;
        }
        self.complex.push(map_of_begin);
        self.keys[CLEAR_CODE as usize] = FullKey::Full(0);
    }

    fn reset(&mut self) {
        self.simples.clear();
        // Keep entry for clear code.
        self.complex.truncate(1);
        self.keys.truncate(usize::from(MIN_ENTRIES));
        for k in self.keys.iter_mut() {
            *k = FullKey::NoSuccessor;
        }
        self.keys[CLEAR_CODE as usize] = FullKey::Full(0);
    }

    /// The code assigned to the next appended entry.
    fn next_code(&self) -> Code {
        self.keys.len() as Code
    }

    fn at_key(&self, code: Code, ch: u8) -> Option<Code> {
        match self.keys[code as usize] {
            FullKey::NoSuccessor => None,
            FullKey::Simple(idx) => {
                let nexts = &self.simples[idx as usize];
                let successors = nexts
                    .codes
                    .iter()
                    .zip(nexts.chars.iter())
                    .take(usize::from(nexts.count));
                for (&scode, &sch) in successors {
                    if sch == ch {
                        return Some(scode);
                    }
                }

                None
            }
            FullKey::Full(idx) => {
                let full = &self.complex[idx as usize];
                let precode = full.char_continuation[usize::from(ch)];
                if precode != NO_CODE {
                    Some(precode)
                } else {
                    None
                }
            }
        }
    }

    /// Iterate to the next char.
    /// Return Ok when it was already in the tree or creates a new entry for it and returns Err.
    fn iterate(&mut self, code: Code, ch: u8) -> Result<Code, Code> {
        if let Some(next) = self.at_key(code, ch) {
            Ok(next)
        } else {
            Err(self.append(code, ch))
        }
    }

    fn append(&mut self, code: Code, ch: u8) -> Code {
        let next = self.next_code();
        debug_assert!(self.at_key(code, ch).is_none());
        match self.keys[code as usize] {
            FullKey::NoSuccessor => {
                let new_key = FullKey::Simple(self.simples.len() as u32);
                let mut simple = Simple::default();
                simple.codes[0] = next;
                simple.chars[0] = ch;
                simple.count = 1;
                self.simples.push(simple);
                self.keys[code as usize] = new_key;
            }
            FullKey::Simple(idx) if usize::from(self.simples[idx as usize].count) < SHORT => {
                let nexts = &mut self.simples[idx as usize];
                let nidx = usize::from(nexts.count);
                nexts.chars[nidx] = ch;
                nexts.codes[nidx] = next;
                nexts.count += 1;
            }
            FullKey::Simple(idx) => {
                let new_key = FullKey::Full(self.complex.len() as u32);
                let simples = &self.simples[idx as usize];
                let mut full = Full {
                    char_continuation: [NO_CODE; 256],
                };
                for (&pch, &pcont) in simples.chars.iter().zip(simples.codes.iter()) {
                    full.char_continuation[usize::from(pch)] = pcont;
                }
                full.char_continuation[usize::from(ch)] = next;
                self.complex.push(full);
                self.keys[code as usize] = new_key;
            }
            FullKey::Full(idx) => {
                let full = &mut self.complex[idx as usize];
                full.char_continuation[usize::from(ch)] = next;
            }
        }
        self.keys.push(FullKey::NoSuccessor);
        next
    }
}

impl Default for Simple {
    fn default() -> Self {
        Simple {
            codes: [0; SHORT],
            chars: [0; SHORT],
            count: 0,
        }
    }
}
