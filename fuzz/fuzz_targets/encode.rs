#![no_main]
use libfuzzer_sys::fuzz_target;
use lzwpack::encode::Encoder;

fuzz_target!(|data: &[u8]| {
    let reference = lzwpack::encode(data);

    // Feeding the input byte by byte through a tiny output buffer must not change the stream.
    let mut encoder = Encoder::new();
    let mut compressed = vec![];
    let mut outbuf = [0u8; 3];
    let mut input = data;
    loop {
        if input.is_empty() {
            encoder.finish();
        }
        let step = &input[..input.len().min(1)];
        let result = encoder.encode_bytes(step, &mut outbuf);
        input = &input[result.consumed_in..];
        compressed.extend_from_slice(&outbuf[..result.consumed_out]);
        if let Ok(lzwpack::LzwStatus::Done) = result.status {
            break;
        }
        assert!(result.status.is_ok(), "{:?}", result.status);
    }

    assert_eq!(reference, compressed);
});
