//! Benchmarks for byte-at-a-time packet assembly
//!
//! Measures how fast the assembler and the full decoder chew through
//! captured traffic, with and without line noise between packets.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rhsp::test_utils::{build_packet, byte_events, sample_stream};
use rhsp::{DecoderConfig, PacketAssembler, RhspDecoder, Timestamp};
use std::hint::black_box;

const INTERFACE_FIRST_ID: u16 = 0x1000;

/// Back-to-back packets with payloads of `payload_len` bytes.
fn clean_traffic(packets: usize, payload_len: usize) -> Vec<u8> {
    let payload: Vec<u8> = (0..payload_len).map(|i| i as u8).collect();
    (0..packets)
        .flat_map(|i| build_packet(i as u8, 0, 0x7F03, &payload))
        .collect()
}

/// The sample stream repeated, so noise and broken markers are interleaved.
fn noisy_traffic(repeats: usize) -> Vec<u8> {
    sample_stream(INTERFACE_FIRST_ID).repeat(repeats)
}

fn bench_assembler(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembler_feed");

    for payload_len in [0usize, 16, 256] {
        let bytes = clean_traffic(256, payload_len);
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("clean", payload_len), &bytes, |b, bytes| {
            b.iter(|| {
                let mut assembler = PacketAssembler::new();
                let mut completed = 0usize;
                for (i, &byte) in bytes.iter().enumerate() {
                    if assembler.feed(byte, Timestamp::from_nanos(i as u64)).is_some() {
                        completed += 1;
                    }
                }
                black_box(completed)
            })
        });
    }

    let noisy = noisy_traffic(256);
    group.throughput(Throughput::Bytes(noisy.len() as u64));
    group.bench_function("noisy", |b| {
        b.iter(|| {
            let mut assembler = PacketAssembler::new();
            for (i, &byte) in noisy.iter().enumerate() {
                black_box(assembler.feed(byte, Timestamp::from_nanos(i as u64)));
            }
            black_box(assembler.stats())
        })
    });

    group.finish();
}

fn bench_decoder(c: &mut Criterion) {
    let events = byte_events(&noisy_traffic(256));
    let config = DecoderConfig::default().with_interface_first_id(u32::from(INTERFACE_FIRST_ID));

    let mut group = c.benchmark_group("decoder");
    group.throughput(Throughput::Bytes(events.len() as u64));

    group.bench_function("decode_all", |b| {
        b.iter(|| {
            let mut decoder = RhspDecoder::new(config.clone());
            black_box(decoder.decode_all(black_box(&events)))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_assembler, bench_decoder);
criterion_main!(benches);
