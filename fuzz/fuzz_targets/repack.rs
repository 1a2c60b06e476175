#![no_main]
use libfuzzer_sys::fuzz_target;
use lzwpack::bits::BitPacker;

fuzz_target!(|data: &[u8]| {
    let (widths, data) = match data.split_first() {
        Some((&widths, data)) => (widths, data),
        None => return,
    };
    let input_width = (widths & 0x7) + 1;
    let output_width = (widths >> 3 & 0xf) + 1;
    let mask = (1u64 << input_width) - 1;

    let mut packer = BitPacker::new(input_width, output_width).unwrap();
    for &byte in data {
        packer.pack(u64::from(byte) & mask).unwrap();
    }

    let mut unpacker = BitPacker::new(output_width, input_width).unwrap();
    for value in packer {
        unpacker.pack(value).unwrap();
    }

    let restored: Vec<_> = unpacker.take(data.len()).collect();
    let expected: Vec<_> = data.iter().map(|&byte| u64::from(byte) & mask).collect();
    assert_eq!(restored, expected);
});
