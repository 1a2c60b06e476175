//! Test support: reads encoded streams back with the widths a decoder uses.
#![allow(dead_code)]
use lzwpack::bits::BitPacker;
use lzwpack::{Code, CLEAR_CODE, END_CODE, MIN_CODE_SIZE};

pub fn code_size(code: Code) -> u8 {
    (Code::BITS - code.leading_zeros()) as u8
}

/// Split an encoded stream into its codes and the width each was read with.
///
/// After each code the next width is derived from the size of the decoder's table, which grows
/// by one for every code except the first one following a clear code.
pub fn read_codes(encoded: &[u8]) -> Vec<(Code, u8)> {
    let mut packer = BitPacker::new(8, MIN_CODE_SIZE).unwrap();
    for &byte in encoded {
        packer.pack(byte.into()).unwrap();
    }

    let mut codes = vec![];
    let mut table_len: Code = 258;
    let mut after_clear = true;
    loop {
        let width = packer.output_field_width();
        let code = packer.next().expect("stream ends with an end code") as Code;
        codes.push((code, width));
        match code {
            CLEAR_CODE => {
                table_len = 258;
                after_clear = true;
            }
            END_CODE => return codes,
            _ => {
                if !after_clear {
                    table_len += 1;
                }
                after_clear = false;
            }
        }

        let next_width = code_size(table_len).max(MIN_CODE_SIZE);
        if next_width != packer.output_field_width() {
            packer.set_output_field_width(next_width).unwrap();
        }
    }
}

/// A straightforward LZW decoder, to check that encoded streams restore their input.
pub fn decode(encoded: &[u8]) -> Vec<u8> {
    let mut table: Vec<Vec<u8>> = vec![];
    let mut prev: Option<Vec<u8>> = None;
    let mut out = vec![];

    for (code, _) in read_codes(encoded) {
        match code {
            CLEAR_CODE => {
                table = (0..=255u8).map(|b| vec![b]).collect();
                table.push(vec![]);
                table.push(vec![]);
                prev = None;
            }
            END_CODE => break,
            code => {
                let code = code as usize;
                let entry = if code < table.len() {
                    table[code].clone()
                } else {
                    assert_eq!(code, table.len(), "code beyond the next table entry");
                    let prev = prev.as_ref().expect("new code directly after clear");
                    let mut entry = prev.clone();
                    entry.push(prev[0]);
                    entry
                };

                if let Some(mut derived) = prev.take() {
                    derived.push(entry[0]);
                    table.push(derived);
                }
                out.extend_from_slice(&entry);
                prev = Some(entry);
            }
        }
    }

    out
}

/// Noise from a small linear congruential generator.
pub fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            (state >> 16) as u8
        })
        .collect()
}

/// Text-like input with plenty of repetition.
pub fn text(len: usize) -> Vec<u8> {
    let words: &[&[u8]] = &[b"stream ", b"filter ", b"object ", b"endobj\n", b"/Length "];
    words
        .iter()
        .cycle()
        .flat_map(|w| w.iter().copied())
        .take(len)
        .collect()
}
