//! Benchmarks for packet type classification
//!
//! Covers table hits at both ends of the priority order, the generic
//! fallback, and record construction including I2C field extraction.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rhsp::test_utils::build_packet;
use rhsp::{AssembledPacket, Timestamp, classify, classify_packet};
use std::hint::black_box;

const INTERFACE_FIRST_ID: u32 = 0x1000;

fn bench_classify(c: &mut Criterion) {
    let base = INTERFACE_FIRST_ID as u16;
    let cases = [
        ("ack", build_packet(2, 1, 0x7F01, &[])),
        ("discovery", build_packet(1, 0, 0x7F0F, &[])),
        ("i2c_write_read", build_packet(3, 0, base + 52, &[0, 0x68, 6, 0x3B])),
        ("generic_command", build_packet(4, 0, 0x2001, &[1, 2, 3])),
        ("generic_response", build_packet(5, 4, 0xA001, &[])),
    ];

    let mut group = c.benchmark_group("classify");
    for (name, bytes) in &cases {
        group.bench_with_input(BenchmarkId::new("table", name), bytes, |b, bytes| {
            b.iter(|| black_box(classify(black_box(bytes), INTERFACE_FIRST_ID)))
        });
    }
    group.finish();
}

fn bench_classify_packet(c: &mut Criterion) {
    let bytes = build_packet(7, 0, INTERFACE_FIRST_ID as u16 + 38, &[1, 0x1A, 3, 0x0F, 0xAA]);
    let packet = AssembledPacket::new(bytes, Timestamp::ZERO, Timestamp::from_nanos(347_200));

    c.bench_function("classify_packet_i2c", |b| {
        b.iter(|| black_box(classify_packet(black_box(&packet), INTERFACE_FIRST_ID)))
    });

    c.bench_function("record_summary", |b| {
        let record = classify_packet(&packet, INTERFACE_FIRST_ID);
        b.iter(|| black_box(record.to_string()))
    });
}

criterion_group!(benches, bench_classify, bench_classify_packet);
criterion_main!(benches);
