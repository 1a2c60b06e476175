mod common;

use common::{noise, text};
use lzwpack::encode::Encoder;
use lzwpack::LzwStatus;

/// Drive the encoder with input chunks of `chunk` bytes and an output buffer of `out_len` bytes.
fn encode_in_steps(data: &[u8], chunk: usize, out_len: usize) -> Vec<u8> {
    let mut encoder = Encoder::new();
    let mut compressed = vec![];
    let mut outbuf = vec![0; out_len];
    let mut input = data;

    loop {
        if input.is_empty() {
            encoder.finish();
        }

        let step = &input[..input.len().min(chunk)];
        let result = encoder.encode_bytes(step, &mut outbuf);
        input = &input[result.consumed_in..];
        compressed.extend_from_slice(&outbuf[..result.consumed_out]);

        match result.status {
            Ok(LzwStatus::Done) => break,
            Ok(LzwStatus::Ok) => {}
            other => panic!("unexpected status {:?}", other),
        }
    }

    assert!(encoder.has_ended());
    compressed
}

#[test]
fn tiny_output_buffers() {
    for data in &[text(5_000), noise(5_000, 2), vec![], vec![7]] {
        let reference = lzwpack::encode(data);
        for &out_len in &[1, 2, 3, 8] {
            for &chunk in &[1, 5, 4096] {
                assert!(
                    encode_in_steps(data, chunk, out_len) == reference,
                    "out {} chunk {} len {}",
                    out_len,
                    chunk,
                    data.len()
                );
            }
        }
    }
}

#[test]
fn ended_encoder_stays_done() {
    let mut encoder = Encoder::new();
    let mut compressed = vec![];
    let result = encoder.into_vec(&mut compressed).encode_all(b"abcabcabc");
    assert_eq!(result.status, Ok(LzwStatus::Done));
    assert_eq!(result.consumed_in, 9);
    assert_eq!(result.consumed_out, compressed.len());
    assert!(encoder.has_ended());

    let mut outbuf = [0u8; 8];
    let result = encoder.encode_bytes(&[], &mut outbuf);
    assert_eq!(result.consumed_out, 0);
    assert_eq!(result.status, Ok(LzwStatus::Done));
}

#[test]
fn partial_vector_encodes_continue() {
    let data = text(20_000);
    let (head, tail) = data.split_at(7_777);

    let mut encoder = Encoder::new();
    let mut compressed = vec![];
    let mut sink = encoder.into_vec(&mut compressed);
    let first = sink.encode(head);
    assert_eq!(first.consumed_in, head.len());
    assert_eq!(first.status, Ok(LzwStatus::Ok));
    let last = sink.encode_all(tail);
    assert_eq!(last.status, Ok(LzwStatus::Done));

    assert_eq!(compressed, lzwpack::encode(&data));
}
