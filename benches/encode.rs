extern crate criterion;
extern crate lzwpack;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lzwpack::bits::BitPacker;
use lzwpack::encode::Encoder;

/// Text-like input with plenty of repetition.
fn text(len: usize) -> Vec<u8> {
    let words: &[&[u8]] = &[b"stream ", b"filter ", b"object ", b"endobj\n", b"/Length "];
    words.iter().cycle().flat_map(|w| w.iter().copied()).take(len).collect()
}

/// Noise from a small linear congruential generator.
fn noise(len: usize) -> Vec<u8> {
    let mut state = 0x2545_f491u32;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            (state >> 16) as u8
        })
        .collect()
}

pub fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for (name, data) in &[("text", text(1 << 20)), ("noise", noise(1 << 20))] {
        let id = BenchmarkId::new(*name, data.len());
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(id, data, |b, data| {
            b.iter(|| {
                let mut encoder = Encoder::with_code_size_limit(12).expect("valid limit");
                let mut outbuf = Vec::with_capacity(data.len());
                let result = encoder.into_vec(&mut outbuf).encode_all(data);
                result.status.expect("Error");
                black_box(&outbuf);
            })
        });
    }
    group.finish();
}

pub fn bench_repack(c: &mut Criterion) {
    let codes: Vec<u64> = noise(1 << 20).iter().map(|&b| u64::from(b) << 1).collect();
    let mut group = c.benchmark_group("repack");
    group.throughput(Throughput::Elements(codes.len() as u64));
    group.bench_function("9-to-8", |b| {
        b.iter(|| {
            let mut packer = BitPacker::with_input_width(9).expect("valid width");
            for &code in &codes {
                packer.pack(code).expect("fits");
            }
            black_box(packer.count());
        })
    });
    group.finish();
}

criterion_group!(benches, bench_encode, bench_repack);
criterion_main!(benches);
